//! Finger God - hex tile simulation core
//!
//! Unit groups walk across a hex map towards tiles or enemies, and fight
//! when hostile groups meet on a tile.

pub mod battle;
pub mod commands;
pub mod core;
pub mod events;
pub mod grid;
pub mod movement;
pub mod presentation;
pub mod scenario;
pub mod simulation;
pub mod targets;
pub mod units;
