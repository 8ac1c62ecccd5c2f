//! Tile selection commands
//!
//! Turns a player's tile taps into orders. Tapping one of the player's groups
//! inspects and selects it; the next tap moves it to a vacant tile or sends it
//! after a foreign group. Structure tiles report an interaction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{Result, SimError};
use crate::core::types::{GroupId, OwnerId};
use crate::events::SimEvent;
use crate::grid::hex::Point2D;
use crate::grid::map::Terrain;
use crate::simulation::Simulation;

/// What a tile selection did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOutcome {
    /// The tile is now selected
    Selected(Point2D),
    /// A structure tile was tapped, with the previously selected group if any
    Interaction {
        tile: Point2D,
        group: Option<GroupId>,
    },
    MoveOrdered {
        group: GroupId,
        to: Point2D,
    },
    AttackOrdered {
        group: GroupId,
        enemy: GroupId,
    },
    /// One of the player's groups was inspected and its tile selected;
    /// `AllyClick` was published
    AllyInspected {
        group: GroupId,
        unit_count: usize,
    },
    /// A foreign group was tapped with nothing of ours selected
    ForeignInspected(GroupId),
}

/// Selection state for one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSelector {
    pub player: OwnerId,
    selected: Option<Point2D>,
}

impl TileSelector {
    pub fn new(player: OwnerId) -> Self {
        Self {
            player,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<Point2D> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Handle a tap on `tile`
    pub fn select_tile(&mut self, sim: &mut Simulation, tile: Point2D) -> Result<SelectionOutcome> {
        let terrain = sim.map().terrain(tile).ok_or(SimError::BlockedTile(tile))?;

        // Our group on the previously selected tile, if any
        let previous = self.selected.take().and_then(|at| self.own_group_at(sim, at));

        if terrain == Terrain::Structure {
            debug!(%tile, group = ?previous, "structure interaction");
            return Ok(SelectionOutcome::Interaction {
                tile,
                group: previous,
            });
        }

        if let Some(occupant) = self.occupant_at(sim, tile) {
            let ours = sim
                .group(occupant)
                .filter(|g| g.owner == Some(self.player))
                .map(|g| g.living_count());
            if let Some(unit_count) = ours {
                sim.publish(SimEvent::AllyClick {
                    group: occupant,
                    unit_count,
                });
                self.selected = Some(tile);
                return Ok(SelectionOutcome::AllyInspected {
                    group: occupant,
                    unit_count,
                });
            }

            return match previous {
                Some(group) => {
                    sim.order_attack(group, occupant)?;
                    Ok(SelectionOutcome::AttackOrdered {
                        group,
                        enemy: occupant,
                    })
                }
                None => Ok(SelectionOutcome::ForeignInspected(occupant)),
            };
        }

        match previous {
            Some(group) if terrain.is_passable() => {
                sim.order_move(group, tile)?;
                Ok(SelectionOutcome::MoveOrdered { group, to: tile })
            }
            _ => {
                self.selected = Some(tile);
                Ok(SelectionOutcome::Selected(tile))
            }
        }
    }

    fn own_group_at(&self, sim: &Simulation, tile: Point2D) -> Option<GroupId> {
        sim.groups()
            .groups_at(tile)
            .into_iter()
            .find(|g| g.owner == Some(self.player))
            .map(|g| g.id)
    }

    /// The group a tap on `tile` refers to; our own group wins over others
    fn occupant_at(&self, sim: &Simulation, tile: Point2D) -> Option<GroupId> {
        let here = sim.groups().groups_at(tile);
        here.iter()
            .find(|g| g.owner == Some(self.player))
            .or_else(|| here.first())
            .map(|g| g.id)
    }
}
