//! Simulation configuration with documented constants
//!
//! All tunable numbers are collected here. Scenario files may override any of
//! them through an optional `[config]` table.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::units::unit::UnitKind;

/// Base combat stats for one kind of unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_health: f32,
    pub attack: f32,
}

impl UnitStats {
    pub fn new(max_health: f32, attack: f32) -> Self {
        Self { max_health, attack }
    }
}

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === BATTLE ===
    /// Simulated seconds between two attack exchanges in a battle
    ///
    /// At 0.25, a battle resolves four exchanges per simulated second.
    /// Leftover time carries over to the next tick, so a long tick can
    /// resolve several exchanges at once.
    pub attack_interval: f32,

    // === MOVEMENT ===
    /// Movement speed of freshly spawned groups, in tiles per second
    ///
    /// At 1.0, a group commits to the next tile after half a second and
    /// finishes the step after one second.
    pub default_move_speed: f32,

    /// Number of people in a group spawned without an explicit roster
    pub default_roster_size: u32,

    // === UNITS ===
    /// Stats of ordinary people
    pub person: UnitStats,

    /// Stats of followers (devoted, tougher than people)
    pub follower: UnitStats,

    /// Stats of demigods
    pub demigod: UnitStats,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            attack_interval: 0.25,
            default_move_speed: 1.0,
            default_roster_size: 10,
            person: UnitStats::new(10.0, 1.0),
            follower: UnitStats::new(15.0, 2.0),
            demigod: UnitStats::new(50.0, 10.0),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Base stats for a unit kind
    pub fn stats_for(&self, kind: UnitKind) -> UnitStats {
        match kind {
            UnitKind::Person => self.person,
            UnitKind::Follower => self.follower,
            UnitKind::DemiGod => self.demigod,
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.attack_interval > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "attack_interval ({}) must be positive",
                self.attack_interval
            )));
        }

        if self.default_move_speed < 0.0 || !self.default_move_speed.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "default_move_speed ({}) must be a finite non-negative number",
                self.default_move_speed
            )));
        }

        for (name, stats) in [
            ("person", self.person),
            ("follower", self.follower),
            ("demigod", self.demigod),
        ] {
            if !(stats.max_health > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name}.max_health must be positive"
                )));
            }
            if stats.attack < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name}.attack must not be negative"
                )));
            }
        }

        Ok(())
    }
}
