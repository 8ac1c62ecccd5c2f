//! Scenarios - a map, starting groups and their opening orders
//!
//! Loaded from TOML files under `data/scenarios/` or generated from a seed.

use std::path::{Path, PathBuf};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{GroupId, OwnerId};
use crate::grid::hex::Point2D;
use crate::grid::map::{Terrain, TileMap};
use crate::simulation::Simulation;
use crate::units::group::RosterSpec;

/// Map layout of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub structures: Vec<Point2D>,
    #[serde(default)]
    pub impassable: Vec<Point2D>,
}

/// A group present at the start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub owner: Option<u32>,
    pub position: Point2D,
    #[serde(flatten)]
    pub roster: RosterSpec,
    /// Tiles per second, the config default when absent
    pub speed: Option<f32>,
}

/// An opening order; `group` and `attack` index into the scenario's groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub group: usize,
    pub move_to: Option<Point2D>,
    pub attack: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default = "default_dt")]
    pub dt: f32,
    pub local_player: Option<u32>,
    pub map: MapSpec,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
    #[serde(default)]
    pub orders: Vec<OrderSpec>,
    #[serde(default)]
    pub config: SimulationConfig,
}

fn default_ticks() -> u64 {
    120
}

fn default_dt() -> f32 {
    0.25
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Path of a named scenario under `data/scenarios/`
    pub fn path_for(name: &str) -> PathBuf {
        PathBuf::from("data/scenarios").join(format!("{}.toml", name))
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        if self.map.width <= 0 || self.map.height <= 0 {
            return Err(SimError::InvalidScenario(format!(
                "map size {}x{} must be positive",
                self.map.width, self.map.height
            )));
        }
        if !(self.dt >= 0.0) || !self.dt.is_finite() {
            return Err(SimError::InvalidScenario(format!("dt ({}) must be non-negative", self.dt)));
        }

        for (index, order) in self.orders.iter().enumerate() {
            if order.group >= self.groups.len() {
                return Err(SimError::InvalidScenario(format!(
                    "order {index} refers to missing group {}",
                    order.group
                )));
            }
            match (order.move_to, order.attack) {
                (Some(_), None) => {}
                (None, Some(enemy)) if enemy < self.groups.len() && enemy != order.group => {}
                (None, Some(enemy)) => {
                    return Err(SimError::InvalidScenario(format!(
                        "order {index} attacks invalid group {enemy}"
                    )));
                }
                _ => {
                    return Err(SimError::InvalidScenario(format!(
                        "order {index} needs exactly one of move_to or attack"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn build_map(&self) -> TileMap {
        let mut map = TileMap::new(self.map.width, self.map.height);
        for tile in &self.map.structures {
            map.set_terrain(*tile, Terrain::Structure);
        }
        for tile in &self.map.impassable {
            map.set_terrain(*tile, Terrain::Impassable);
        }
        map
    }

    /// Create the simulation, spawn every group and issue the opening orders
    ///
    /// Returns the simulation and the ids of the spawned groups, in file order.
    pub fn build(&self) -> Result<(Simulation, Vec<GroupId>)> {
        self.validate()?;
        let mut sim = Simulation::new(self.build_map(), self.config.clone());
        if let Some(player) = self.local_player {
            sim = sim.with_local_player(OwnerId(player));
        }

        let mut ids = Vec::with_capacity(self.groups.len());
        for spec in &self.groups {
            let roster = if spec.roster.total() == 0 {
                RosterSpec::people(self.config.default_roster_size)
            } else {
                spec.roster
            };
            let units = roster.build(&self.config);
            let speed = spec.speed.unwrap_or(self.config.default_move_speed);
            ids.push(sim.spawn_group_with(spec.owner.map(OwnerId), spec.position, units, speed)?);
        }

        for order in &self.orders {
            let group = ids[order.group];
            match (order.move_to, order.attack) {
                (Some(tile), _) => sim.order_move(group, tile)?,
                (None, Some(enemy)) => sim.order_attack(group, ids[enemy])?,
                (None, None) => {}
            }
        }

        info!(
            scenario = %self.name,
            groups = ids.len(),
            orders = self.orders.len(),
            "scenario built"
        );
        Ok((sim, ids))
    }

    /// Two owners facing each other across a map with scattered obstacles
    ///
    /// The same seed always gives the same scenario. The middle row and both
    /// spawn columns stay open, so every group can reach every other.
    pub fn random_skirmish(seed: u64, width: i32, height: i32, groups_per_side: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let width = width.max(5);
        let height = height.max(3);
        let corridor = height / 2;

        let mut impassable = Vec::new();
        for q in 2..width - 2 {
            for r in 0..height {
                if r != corridor && rng.gen_bool(0.1) {
                    impassable.push(Point2D::new(q, r));
                }
            }
        }

        let mut groups = Vec::with_capacity(groups_per_side * 2);
        for (owner, column) in [(1, 0), (2, width - 1)] {
            for _ in 0..groups_per_side {
                groups.push(GroupSpec {
                    owner: Some(owner),
                    position: Point2D::new(column, rng.gen_range(0..height)),
                    roster: RosterSpec {
                        people: rng.gen_range(3..=8),
                        followers: rng.gen_range(0..=2),
                        demigods: u32::from(rng.gen_bool(0.2)),
                    },
                    speed: Some(rng.gen_range(0.75..1.5)),
                });
            }
        }

        let mut orders = Vec::with_capacity(groups.len());
        if groups_per_side > 0 {
            for index in 0..groups.len() {
                let side_start = if index < groups_per_side { groups_per_side } else { 0 };
                orders.push(OrderSpec {
                    group: index,
                    move_to: None,
                    attack: Some(side_start + rng.gen_range(0..groups_per_side)),
                });
            }
        }

        Scenario {
            name: format!("skirmish-{seed}"),
            ticks: default_ticks(),
            dt: default_dt(),
            local_player: Some(1),
            map: MapSpec {
                width,
                height,
                structures: Vec::new(),
                impassable,
            },
            groups,
            orders,
            config: SimulationConfig::default(),
        }
    }
}
