//! Path-finding targets
//!
//! A target tells a group where to go, whether that place has moved since the
//! last plan, and when the group can stop caring about it.

pub mod enemy;
pub mod tile;

use std::fmt;

use ahash::{AHashMap, AHashSet};

use crate::core::error::Result;
use crate::core::types::{GroupId, TargetId};
use crate::grid::hex::Point2D;
use crate::grid::map::TileMap;
use crate::units::group::UnitGroup;
use crate::units::registry::GroupSnapshot;

pub use enemy::EnemyTarget;
pub use tile::TileTarget;

/// What a target may look at while answering queries
///
/// Group data comes from a snapshot taken at the start of the tick, so no
/// group's movement depends on another group's movement in the same tick.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    pub map: &'a TileMap,
    pub groups: &'a AHashMap<GroupId, GroupSnapshot>,
}

impl<'a> TargetContext<'a> {
    pub fn new(map: &'a TileMap, groups: &'a AHashMap<GroupId, GroupSnapshot>) -> Self {
        Self { map, groups }
    }

    pub fn group(&self, id: GroupId) -> Option<&'a GroupSnapshot> {
        self.groups.get(&id)
    }
}

/// A destination a group steers towards
pub trait PathFindingTarget: fmt::Debug {
    /// Plan a path from `from`; the path may start with `from` itself
    fn path_to_target(&mut self, from: Point2D, ctx: &TargetContext) -> Result<Vec<Point2D>>;

    /// Has the destination moved since the last plan?
    fn has_location_changed(&self, ctx: &TargetContext) -> Result<bool>;

    /// Is the group done with this target?
    fn is_fulfilled(&self, group: &UnitGroup, ctx: &TargetContext) -> Result<bool>;
}

/// Owns every live target, keyed by id
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: AHashMap<TargetId, Box<dyn PathFindingTarget>>,
    next_id: u32,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: Box<dyn PathFindingTarget>) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.insert(id, target);
        id
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut dyn PathFindingTarget> {
        match self.targets.get_mut(&id) {
            Some(target) => Some(&mut **target),
            None => None,
        }
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn remove(&mut self, id: TargetId) -> Option<Box<dyn PathFindingTarget>> {
        self.targets.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Drop targets no group refers to any more; returns how many went
    pub fn retain_referenced(&mut self, referenced: &AHashSet<TargetId>) -> usize {
        let before = self.targets.len();
        self.targets.retain(|id, _| referenced.contains(id));
        before - self.targets.len()
    }
}
