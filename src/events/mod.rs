//! Notifications published by the simulation
//!
//! Controllers hold an [`EventSink`] from construction and publish into it
//! synchronously. Consumers either read an [`EventLog`] after the tick or
//! receive events over an mpsc channel.

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::core::types::GroupId;
use crate::grid::hex::Point2D;

/// Outcome of a finished battle, from group A's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleResult {
    /// Both groups fell in the same exchange
    Tie,
    AWin,
    BWin,
}

impl BattleResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            BattleResult::Tie => "tie",
            BattleResult::AWin => "awin",
            BattleResult::BWin => "bwin",
        }
    }
}

/// Something observers may react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SimEvent {
    /// A group committed to a new tile (or was teleported)
    UnitMoved {
        #[serde(rename = "newPos")]
        new_pos: Point2D,
        #[serde(rename = "oldPos")]
        old_pos: Point2D,
        unit: GroupId,
    },
    /// A battle reached a terminal outcome
    BattleEnd {
        result: BattleResult,
        #[serde(rename = "groupA")]
        group_a: GroupId,
        #[serde(rename = "groupB")]
        group_b: GroupId,
    },
    /// The player selected one of their own groups
    AllyClick {
        group: GroupId,
        #[serde(rename = "unitCount")]
        unit_count: usize,
    },
}

impl SimEvent {
    /// Event name as seen by subscribers
    pub fn name(&self) -> &'static str {
        match self {
            SimEvent::UnitMoved { .. } => "UnitMoved",
            SimEvent::BattleEnd { .. } => "BattleEnd",
            SimEvent::AllyClick { .. } => "AllyClick",
        }
    }
}

impl std::fmt::Display for SimEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimEvent::UnitMoved {
                new_pos,
                old_pos,
                unit,
            } => write!(f, "UnitMoved {unit}: {old_pos} -> {new_pos}"),
            SimEvent::BattleEnd {
                result,
                group_a,
                group_b,
            } => write!(f, "BattleEnd {group_a} vs {group_b}: {}", result.as_str()),
            SimEvent::AllyClick { group, unit_count } => {
                write!(f, "AllyClick {group}: {unit_count} units")
            }
        }
    }
}

/// Receiver of simulation events
pub trait EventSink {
    fn publish(&mut self, event: SimEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn publish(&mut self, event: SimEvent) {
        (**self).publish(event);
    }
}

impl EventSink for Sender<SimEvent> {
    fn publish(&mut self, event: SimEvent) {
        if self.send(event).is_err() {
            tracing::debug!("event receiver dropped, discarding event");
        }
    }
}

/// In-memory event capture
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every captured event, leaving the log empty
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Captured `UnitMoved` events as (unit, old, new)
    pub fn unit_moves(&self) -> Vec<(GroupId, Point2D, Point2D)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::UnitMoved {
                    new_pos,
                    old_pos,
                    unit,
                } => Some((*unit, *old_pos, *new_pos)),
                _ => None,
            })
            .collect()
    }

    /// Captured `BattleEnd` events as (result, a, b)
    pub fn battle_ends(&self) -> Vec<(BattleResult, GroupId, GroupId)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::BattleEnd {
                    result,
                    group_a,
                    group_b,
                } => Some((*result, *group_a, *group_b)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for EventLog {
    fn publish(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}
