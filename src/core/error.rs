use thiserror::Error;

use crate::core::types::{GroupId, SessionId, TargetId};
use crate::grid::hex::Point2D;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unit group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("Target not found: {0}")]
    TargetNotFound(TargetId),

    #[error("{session} references missing unit group {group}")]
    BattleGroupMissing { session: SessionId, group: GroupId },

    #[error("{0} cannot fight itself")]
    SelfEngagement(GroupId),

    #[error("{0} is already in battle")]
    AlreadyInBattle(GroupId),

    #[error("Tile {0} cannot hold a group")]
    BlockedTile(Point2D),

    #[error("No living units to spawn at {0}")]
    EmptyRoster(Point2D),

    #[error("{0} has no living units")]
    GroupDefeated(GroupId),

    #[error("{group} is not hostile to {enemy}")]
    NotHostile { group: GroupId, enemy: GroupId },

    #[error("No path from {from} to {to}")]
    NoPath { from: Point2D, to: Point2D },

    #[error("Asset load error: {0}")]
    AssetLoad(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
