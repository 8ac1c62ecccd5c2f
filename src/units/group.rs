//! Unit groups: all units on one tile belonging to one owner
//!
//! A group carries its roster, its position on the grid and the state of
//! the tile-to-tile transition it may be in the middle of.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{GroupId, OwnerId, TargetId};
use crate::grid::hex::{interpolate_world, Point2D};
use crate::units::unit::{SingleUnit, UnitKind};

/// Relation of a group to the local player, used for presentation tinting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Neutral,
    Allied,
    Enemy,
}

impl Alignment {
    /// RGBA tint for the group's visual instances
    pub fn tint(&self) -> [f32; 4] {
        match self {
            Alignment::Neutral => [1.0, 1.0, 1.0, 1.0],
            Alignment::Allied => [0.0, 0.2, 1.0, 1.0],
            Alignment::Enemy => [1.0, 0.2, 0.0, 1.0],
        }
    }
}

/// Which controller drives a group this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupMode {
    #[default]
    Moving,
    InBattle,
}

/// How many units of each kind a new group starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterSpec {
    #[serde(default)]
    pub people: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub demigods: u32,
}

impl RosterSpec {
    pub fn people(count: u32) -> Self {
        Self {
            people: count,
            ..Self::default()
        }
    }

    pub fn total(&self) -> u32 {
        self.people + self.followers + self.demigods
    }

    /// Build the roster with stats taken from the config
    pub fn build(&self, config: &SimulationConfig) -> Vec<SingleUnit> {
        let mut roster = Vec::with_capacity(self.total() as usize);
        for (kind, count) in [
            (UnitKind::Person, self.people),
            (UnitKind::Follower, self.followers),
            (UnitKind::DemiGod, self.demigods),
        ] {
            let stats = config.stats_for(kind);
            roster.extend((0..count).map(|_| SingleUnit::new(kind, stats)));
        }
        roster
    }
}

/// A change of logical position, published as `UnitMoved`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMoved {
    pub group: GroupId,
    pub old_pos: Point2D,
    pub new_pos: Point2D,
}

/// A roster of units sharing a tile
#[derive(Debug, Clone)]
pub struct UnitGroup {
    pub id: GroupId,
    pub owner: Option<OwnerId>,
    pub alignment: Alignment,
    roster: Vec<SingleUnit>,

    // Position
    pub(crate) position: Point2D,
    pub(crate) start_position: Point2D,
    pub(crate) end_position: Point2D,
    pub(crate) path: VecDeque<Point2D>,
    pub(crate) step_progress: f32,
    pub move_speed: f32, // Tiles per second

    // State
    pub halted: bool,
    pub mode: GroupMode,
    pub(crate) target: Option<TargetId>,

    /// Added to the interpolated anchor when rendering
    pub render_offset: Vec2,
}

impl UnitGroup {
    pub fn new(
        id: GroupId,
        owner: Option<OwnerId>,
        position: Point2D,
        roster: Vec<SingleUnit>,
        move_speed: f32,
    ) -> Self {
        Self {
            id,
            owner,
            alignment: Alignment::default(),
            roster,
            position,
            start_position: position,
            end_position: position,
            path: VecDeque::new(),
            step_progress: 0.0,
            move_speed,
            halted: false,
            mode: GroupMode::Moving,
            target: None,
            render_offset: Vec2::ZERO,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    // === ROSTER ===

    pub fn units(&self) -> &[SingleUnit] {
        &self.roster
    }

    pub fn units_mut(&mut self) -> &mut [SingleUnit] {
        &mut self.roster
    }

    /// Total roster size, including units that died this exchange
    pub fn headcount(&self) -> usize {
        self.roster.len()
    }

    pub fn living_count(&self) -> usize {
        self.roster.iter().filter(|u| u.is_alive()).count()
    }

    /// A group with no living units is out of the simulation
    pub fn is_defeated(&self) -> bool {
        self.living_count() == 0
    }

    /// Attack values of every living unit, taken before any damage is applied
    pub fn strikes(&self) -> Vec<f32> {
        self.roster.iter().filter_map(|u| u.strike()).collect()
    }

    /// Apply incoming strikes. Each strike is split evenly across the units
    /// alive when this call starts. Returns the number of units killed.
    pub fn absorb_strikes(&mut self, strikes: &[f32]) -> usize {
        let living = self.living_count();
        if living == 0 || strikes.is_empty() {
            return 0;
        }

        let share = strikes.iter().sum::<f32>() / living as f32;
        self.roster
            .iter_mut()
            .filter(|u| u.is_alive())
            .map(|u| u.take_damage(share))
            .filter(|killed| *killed)
            .count()
    }

    /// Drop dead units from the roster and hand them back to the caller
    pub fn remove_dead(&mut self) -> Vec<SingleUnit> {
        let (alive, dead): (Vec<_>, Vec<_>) =
            self.roster.drain(..).partition(|u| u.is_alive());
        self.roster = alive;
        dead
    }

    /// Heal every living unit
    pub fn heal_all(&mut self, amount: f32) {
        for unit in &mut self.roster {
            unit.heal(amount);
        }
    }

    // === POSITION ===

    /// Last tile the group logically occupies
    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn start_position(&self) -> Point2D {
        self.start_position
    }

    pub fn end_position(&self) -> Point2D {
        self.end_position
    }

    pub fn step_progress(&self) -> f32 {
        self.step_progress
    }

    /// Is a tile-to-tile transition in flight?
    pub fn is_in_transition(&self) -> bool {
        self.start_position != self.end_position
    }

    pub fn path(&self) -> &VecDeque<Point2D> {
        &self.path
    }

    /// Append a waypoint to the movement path
    pub fn push_waypoint(&mut self, waypoint: Point2D) {
        self.path.push_back(waypoint);
    }

    /// Replace the movement path
    pub fn set_path(&mut self, path: impl IntoIterator<Item = Point2D>) {
        self.path = path.into_iter().collect();
    }

    /// Drop all waypoints; movement stops from the next tick
    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Teleport to a tile, cancelling any transition
    pub fn set_position(&mut self, position: Point2D) -> GroupMoved {
        let old_pos = self.position;
        self.position = position;
        self.start_position = position;
        self.end_position = position;
        self.step_progress = 0.0;
        GroupMoved {
            group: self.id,
            old_pos,
            new_pos: position,
        }
    }

    /// World-space anchor for rendering, interpolated along the current transition
    pub fn render_anchor(&self) -> Vec2 {
        interpolate_world(self.start_position, self.end_position, self.step_progress)
            + self.render_offset
    }

    // === TARGETING ===

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    pub(crate) fn clear_target(&mut self) {
        self.target = None;
    }

    /// Groups of different owners fight; two neutral groups do not
    pub fn is_hostile_to(&self, other: &UnitGroup) -> bool {
        match (self.owner, other.owner) {
            (None, None) => false,
            (a, b) => a != b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UnitStats;

    fn group_of(count: usize, health: f32, attack: f32) -> UnitGroup {
        let roster = (0..count)
            .map(|_| SingleUnit::new(UnitKind::Person, UnitStats::new(health, attack)))
            .collect();
        UnitGroup::new(GroupId(1), Some(OwnerId(1)), Point2D::new(0, 0), roster, 1.0)
    }

    #[test]
    fn test_roster_spec_builds_each_kind() {
        let config = SimulationConfig::default();
        let spec = RosterSpec {
            people: 3,
            followers: 2,
            demigods: 1,
        };
        let roster = spec.build(&config);
        assert_eq!(roster.len(), 6);
        assert_eq!(roster.iter().filter(|u| u.kind == UnitKind::Follower).count(), 2);
        assert_eq!(roster.last().map(|u| u.kind), Some(UnitKind::DemiGod));
        assert_eq!(roster[0].max_health(), config.person.max_health);
    }

    #[test]
    fn test_strikes_skip_dead_units() {
        let mut group = group_of(3, 10.0, 5.0);
        group.units_mut()[1].take_damage(10.0);
        assert_eq!(group.strikes(), vec![5.0, 5.0]);
        assert_eq!(group.living_count(), 2);
        assert_eq!(group.headcount(), 3);
    }

    #[test]
    fn test_absorb_splits_damage_evenly() {
        let mut group = group_of(3, 10.0, 1.0);
        let killed = group.absorb_strikes(&[6.0]);
        assert_eq!(killed, 0);
        for unit in group.units() {
            assert_eq!(unit.health(), 8.0);
        }
    }

    #[test]
    fn test_absorb_on_empty_roster_is_noop() {
        let mut group = group_of(0, 10.0, 1.0);
        assert_eq!(group.absorb_strikes(&[100.0]), 0);
        assert!(group.is_defeated());
        assert!(group.strikes().is_empty());
    }

    #[test]
    fn test_remove_dead_shrinks_roster() {
        let mut group = group_of(4, 10.0, 1.0);
        group.units_mut()[0].take_damage(10.0);
        group.units_mut()[3].take_damage(10.0);

        let dead = group.remove_dead();
        assert_eq!(dead.len(), 2);
        assert_eq!(group.headcount(), 2);
        assert!(group.units().iter().all(|u| u.is_alive()));
    }

    #[test]
    fn test_heal_all_on_empty_group_is_noop() {
        let mut group = group_of(0, 10.0, 1.0);
        group.heal_all(5.0);
        assert_eq!(group.headcount(), 0);
    }

    #[test]
    fn test_set_position_resets_transition() {
        let mut group = group_of(1, 10.0, 1.0);
        group.end_position = Point2D::new(1, 0);
        group.step_progress = 0.3;

        let moved = group.set_position(Point2D::new(4, 4));
        assert_eq!(moved.old_pos, Point2D::new(0, 0));
        assert_eq!(moved.new_pos, Point2D::new(4, 4));
        assert_eq!(group.start_position(), Point2D::new(4, 4));
        assert_eq!(group.end_position(), Point2D::new(4, 4));
        assert_eq!(group.step_progress(), 0.0);
        assert!(!group.is_in_transition());
    }

    #[test]
    fn test_render_anchor_follows_progress() {
        let mut group = group_of(1, 10.0, 1.0);
        group.end_position = Point2D::new(1, 0);
        group.step_progress = 0.5;
        group.render_offset = Vec2::new(0.0, 1.0);

        let expected = (Point2D::new(0, 0).to_world() + Point2D::new(1, 0).to_world()) * 0.5
            + Vec2::new(0.0, 1.0);
        assert!((group.render_anchor() - expected).length() < 1e-5);
    }

    #[test]
    fn test_hostility() {
        let a = group_of(1, 10.0, 1.0);
        let mut b = group_of(1, 10.0, 1.0);
        assert!(!a.is_hostile_to(&b));

        b.owner = Some(OwnerId(2));
        assert!(a.is_hostile_to(&b));

        b.owner = None;
        assert!(a.is_hostile_to(&b));

        let mut c = group_of(1, 10.0, 1.0);
        c.owner = None;
        assert!(!b.is_hostile_to(&c));
    }

    #[test]
    fn test_alignment_tints() {
        assert_eq!(Alignment::Neutral.tint(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Alignment::Allied.tint()[2], 1.0);
        assert_eq!(Alignment::Enemy.tint()[0], 1.0);
    }
}
