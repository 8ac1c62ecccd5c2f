//! Simulation - the game loop tying movement, battles and targets together
//!
//! One `tick(dt)`:
//! 1. snapshot every group for target queries
//! 2. advance movement for groups not in battle
//! 3. start a battle wherever a group moved onto (or swapped tiles with) a hostile group
//! 4. advance battles, then remove defeated groups and release survivors
//! 5. drop targets no group refers to any more

use ahash::AHashSet;
use tracing::{debug, info};

use crate::battle::{BattleController, BattleEnded};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{GroupId, OwnerId, TargetId, Tick};
use crate::events::{EventLog, EventSink, SimEvent};
use crate::grid::hex::Point2D;
use crate::grid::map::TileMap;
use crate::movement::MovementController;
use crate::presentation::{attach_visuals, release_visuals, NullVisuals, VisualSink};
use crate::targets::{EnemyTarget, PathFindingTarget, TargetContext, TargetRegistry, TileTarget};
use crate::units::group::{Alignment, GroupMode, RosterSpec, UnitGroup};
use crate::units::registry::GroupRegistry;
use crate::units::unit::SingleUnit;

/// The whole simulation state
pub struct Simulation {
    config: SimulationConfig,
    map: TileMap,
    groups: GroupRegistry,
    targets: TargetRegistry,
    movement: MovementController<EventLog>,
    battles: BattleController<EventLog>,
    visuals: Box<dyn VisualSink>,
    observers: Vec<Box<dyn EventSink>>,
    /// Events published between ticks, handed out with the next tick
    pending: Vec<SimEvent>,
    local_player: Option<OwnerId>,
    current_tick: Tick,
    elapsed: f64,
}

impl Simulation {
    pub fn new(map: TileMap, config: SimulationConfig) -> Self {
        let attack_interval = config.attack_interval;
        Self {
            config,
            map,
            groups: GroupRegistry::new(),
            targets: TargetRegistry::new(),
            movement: MovementController::new(EventLog::new()),
            battles: BattleController::new(EventLog::new(), attack_interval),
            visuals: Box::new(NullVisuals::default()),
            observers: Vec::new(),
            pending: Vec::new(),
            local_player: None,
            current_tick: 0,
            elapsed: 0.0,
        }
    }

    /// Use a presentation backend for unit visuals
    pub fn with_visuals(mut self, visuals: Box<dyn VisualSink>) -> Self {
        self.visuals = visuals;
        self
    }

    /// Groups owned by this player are tinted as allies, other owners as enemies
    pub fn with_local_player(mut self, player: OwnerId) -> Self {
        self.local_player = Some(player);
        self
    }

    /// Forward every event to `observer` as well as returning it from `tick`
    pub fn add_observer(&mut self, observer: Box<dyn EventSink>) {
        self.observers.push(observer);
    }

    // === ACCESS ===

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&UnitGroup> {
        self.groups.get(id)
    }

    pub fn battles(&self) -> &BattleController<EventLog> {
        &self.battles
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Simulated seconds since the start
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    fn group_mut(&mut self, id: GroupId) -> Result<&mut UnitGroup> {
        self.groups.get_mut(id).ok_or(SimError::GroupNotFound(id))
    }

    // === SPAWNING ===

    /// Spawn a group with a roster built from the configured unit stats
    pub fn spawn_group(
        &mut self,
        owner: Option<OwnerId>,
        position: Point2D,
        roster: &RosterSpec,
    ) -> Result<GroupId> {
        let units = roster.build(&self.config);
        let speed = self.config.default_move_speed;
        self.spawn_group_with(owner, position, units, speed)
    }

    /// Spawn a group with an explicit roster and speed
    pub fn spawn_group_with(
        &mut self,
        owner: Option<OwnerId>,
        position: Point2D,
        units: Vec<SingleUnit>,
        move_speed: f32,
    ) -> Result<GroupId> {
        if !self.map.is_passable(position) {
            return Err(SimError::BlockedTile(position));
        }
        if !units.iter().any(SingleUnit::is_alive) {
            return Err(SimError::EmptyRoster(position));
        }

        let alignment = self.alignment_of(owner);
        let id = self.groups.spawn(owner, position, units, move_speed);
        if let Some(group) = self.groups.get_mut(id) {
            group.alignment = alignment;
            attach_visuals(group, self.visuals.as_mut());
            debug!(group = %id, %position, units = group.headcount(), "group spawned");
        }
        Ok(id)
    }

    fn alignment_of(&self, owner: Option<OwnerId>) -> Alignment {
        match (owner, self.local_player) {
            (None, _) => Alignment::Neutral,
            (Some(owner), Some(player)) if owner == player => Alignment::Allied,
            (Some(_), Some(_)) => Alignment::Enemy,
            (Some(_), None) => Alignment::Neutral,
        }
    }

    // === ORDERS ===

    /// Walk a group to a tile
    pub fn order_move(&mut self, group: GroupId, tile: Point2D) -> Result<()> {
        self.assign_target(group, Box::new(TileTarget::new(tile)))
    }

    /// Send a group after a hostile group
    pub fn order_attack(&mut self, group: GroupId, enemy: GroupId) -> Result<()> {
        let hunter = self.groups.get(group).ok_or(SimError::GroupNotFound(group))?;
        let prey = self.groups.get(enemy).ok_or(SimError::GroupNotFound(enemy))?;
        if !hunter.is_hostile_to(prey) {
            return Err(SimError::NotHostile { group, enemy });
        }
        self.assign_target(group, Box::new(EnemyTarget::new(enemy)))
    }

    fn assign_target(&mut self, group: GroupId, target: Box<dyn PathFindingTarget>) -> Result<()> {
        if !self.groups.contains(group) {
            return Err(SimError::GroupNotFound(group));
        }
        let target_id = self.targets.insert(target);
        let snapshot = self.groups.snapshot();
        let ctx = TargetContext::new(&self.map, &snapshot);

        let assigned = match (self.groups.get_mut(group), self.targets.get_mut(target_id)) {
            (Some(g), Some(t)) => self.movement.assign_target(g, target_id, t, &ctx),
            (None, _) => Err(SimError::GroupNotFound(group)),
            (_, None) => Err(SimError::TargetNotFound(target_id)),
        };

        if let Err(err) = assigned {
            self.targets.remove(target_id);
            return Err(err);
        }
        self.prune_targets();
        Ok(())
    }

    /// Append a waypoint to a group's path
    pub fn push_waypoint(&mut self, group: GroupId, waypoint: Point2D) -> Result<()> {
        self.group_mut(group)?.push_waypoint(waypoint);
        Ok(())
    }

    /// Stop or resume a group; a halted group keeps its path and progress
    pub fn set_halted(&mut self, group: GroupId, halted: bool) -> Result<()> {
        self.group_mut(group)?.halted = halted;
        Ok(())
    }

    /// Drop a group's waypoints; an in-flight step freezes where it is
    pub fn clear_path(&mut self, group: GroupId) -> Result<()> {
        self.group_mut(group)?.clear_path();
        Ok(())
    }

    /// Place a group on a tile immediately
    ///
    /// Landing on a hostile group starts a battle on the next tick.
    pub fn teleport(&mut self, group: GroupId, to: Point2D) -> Result<()> {
        if !self.map.contains(to) {
            return Err(SimError::BlockedTile(to));
        }
        let g = self.groups.get_mut(group).ok_or(SimError::GroupNotFound(group))?;
        if g.is_defeated() {
            return Err(SimError::GroupDefeated(group));
        }
        self.movement.teleport(g, to);
        Ok(())
    }

    /// Publish an event outside the tick, delivered with the next tick's events
    pub fn publish(&mut self, event: SimEvent) {
        self.pending.push(event);
    }

    // === TICK ===

    /// Advance the world by `dt` seconds and return everything that happened
    pub fn tick(&mut self, dt: f32) -> Result<Vec<SimEvent>> {
        self.current_tick += 1;
        self.elapsed += f64::from(dt);

        let snapshot = self.groups.snapshot();
        let ctx = TargetContext::new(&self.map, &snapshot);
        self.movement
            .advance(&mut self.groups, &mut self.targets, &ctx, dt);

        let mut events = std::mem::take(&mut self.pending);
        let moves = self.movement.sink_mut().drain();
        let arrivals: Vec<(GroupId, Point2D, Point2D)> = moves
            .iter()
            .filter_map(|event| match event {
                SimEvent::UnitMoved {
                    new_pos,
                    old_pos,
                    unit,
                } => Some((*unit, *old_pos, *new_pos)),
                _ => None,
            })
            .collect();
        events.extend(moves);

        let resolved = self.resolve_battles(&arrivals, dt);
        events.extend(self.battles.sink_mut().drain());
        if let Err(err) = resolved {
            // Nothing drained this tick is lost; it goes out with the next one
            self.pending = events;
            return Err(err);
        }

        self.prune_targets();

        for observer in &mut self.observers {
            for event in &events {
                observer.publish(event.clone());
            }
        }
        Ok(events)
    }

    /// Run `ticks` ticks of `dt` seconds, collecting all events
    pub fn run(&mut self, ticks: u64, dt: f32) -> Result<Vec<SimEvent>> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.tick(dt)?);
        }
        Ok(events)
    }

    fn resolve_battles(&mut self, arrivals: &[(GroupId, Point2D, Point2D)], dt: f32) -> Result<()> {
        for &(unit, old_pos, new_pos) in arrivals {
            self.engage_on_arrival(unit, old_pos, new_pos, arrivals)?;
        }

        let ended = self
            .battles
            .advance(&mut self.groups, self.visuals.as_mut(), dt)?;
        for end in &ended {
            self.settle_battle(end);
        }
        Ok(())
    }

    /// Start a battle if `mover` just entered a tile held by a hostile group
    ///
    /// Two hostile groups swapping tiles in the same tick meet on the way
    /// and fight as well.
    fn engage_on_arrival(
        &mut self,
        mover: GroupId,
        from: Point2D,
        tile: Point2D,
        arrivals: &[(GroupId, Point2D, Point2D)],
    ) -> Result<()> {
        let Some(group) = self.groups.get(mover) else {
            return Ok(());
        };
        if group.mode != GroupMode::Moving || group.position() != tile || group.is_defeated() {
            return Ok(());
        }

        let can_fight = |other: &UnitGroup| {
            other.id != mover
                && other.mode == GroupMode::Moving
                && !other.is_defeated()
                && group.is_hostile_to(other)
        };

        let occupant = self
            .groups
            .groups_at(tile)
            .into_iter()
            .find(|other| can_fight(*other))
            .map(|other| other.id);

        let crossing = || {
            arrivals
                .iter()
                .filter(|(_, old, new)| *old == tile && *new == from)
                .filter_map(|(id, _, _)| self.groups.get(*id))
                .find(|other| can_fight(*other))
                .map(|other| other.id)
        };

        if let Some(opponent) = occupant.or_else(crossing) {
            self.battles.start(&mut self.groups, mover, opponent)?;
        }
        Ok(())
    }

    /// Remove defeated groups and send survivors back to moving
    fn settle_battle(&mut self, end: &BattleEnded) {
        for id in [end.group_a, end.group_b] {
            let defeated = match self.groups.get_mut(id) {
                Some(group) if group.is_defeated() => true,
                Some(group) => {
                    group.mode = GroupMode::Moving;
                    false
                }
                None => false,
            };
            if defeated {
                if let Some(group) = self.groups.remove(id) {
                    release_visuals(group.units(), self.visuals.as_mut());
                    info!(group = %id, "group destroyed");
                }
            }
        }
    }

    fn prune_targets(&mut self) {
        let referenced: AHashSet<TargetId> =
            self.groups.iter().filter_map(|g| g.target()).collect();
        let dropped = self.targets.retain_referenced(&referenced);
        if dropped > 0 {
            debug!(dropped, "pruned unreferenced targets");
        }
    }
}
