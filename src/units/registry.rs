//! Group registry - owns every live unit group, keyed by id

use ahash::AHashMap;

use crate::core::types::{GroupId, OwnerId};
use crate::grid::hex::Point2D;
use crate::units::group::UnitGroup;
use crate::units::unit::SingleUnit;

/// Read-only view of a group, taken once per tick for target queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub owner: Option<OwnerId>,
    pub position: Point2D,
    pub living: usize,
}

/// All unit groups in the simulation
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: AHashMap<GroupId, UnitGroup>,
    next_id: u32,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new group and return its id
    pub fn spawn(
        &mut self,
        owner: Option<OwnerId>,
        position: Point2D,
        roster: Vec<SingleUnit>,
        move_speed: f32,
    ) -> GroupId {
        let id = GroupId(self.next_id);
        self.next_id += 1;
        self.groups
            .insert(id, UnitGroup::new(id, owner, position, roster, move_speed));
        id
    }

    pub fn get(&self, id: GroupId) -> Option<&UnitGroup> {
        self.groups.get(&id)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut UnitGroup> {
        self.groups.get_mut(&id)
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    pub fn remove(&mut self, id: GroupId) -> Option<UnitGroup> {
        self.groups.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitGroup> {
        self.groups.values()
    }

    /// Ids in ascending order, for deterministic iteration
    pub fn ids_sorted(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Groups whose logical position is `position`, in id order
    pub fn groups_at(&self, position: Point2D) -> Vec<&UnitGroup> {
        let mut found: Vec<&UnitGroup> = self
            .groups
            .values()
            .filter(|g| g.position() == position)
            .collect();
        found.sort_by_key(|g| g.id);
        found
    }

    /// Freeze positions, owners and living counts for this tick
    pub fn snapshot(&self) -> AHashMap<GroupId, GroupSnapshot> {
        self.groups
            .values()
            .map(|g| {
                (
                    g.id,
                    GroupSnapshot {
                        id: g.id,
                        owner: g.owner,
                        position: g.position(),
                        living: g.living_count(),
                    },
                )
            })
            .collect()
    }

    /// Borrow two distinct groups mutably at once
    ///
    /// Returns None if the ids are equal or either group is missing.
    pub fn with_pair_mut<R>(
        &mut self,
        a: GroupId,
        b: GroupId,
        f: impl FnOnce(&mut UnitGroup, &mut UnitGroup) -> R,
    ) -> Option<R> {
        if a == b || !self.groups.contains_key(&a) {
            return None;
        }
        let mut first = self.groups.remove(&a)?;
        let result = self.groups.get_mut(&b).map(|second| f(&mut first, second));
        self.groups.insert(a, first);
        result
    }
}
