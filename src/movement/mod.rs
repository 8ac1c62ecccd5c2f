//! Tile-to-tile group movement
//!
//! A group walks its waypoint path one tile at a time. Each step is a
//! transition from `start_position` to `end_position` with `step_progress`
//! running from 0 to 1. The logical position switches to the new tile at
//! the halfway point, when `UnitMoved` is published; the step completes at 1.

use std::collections::VecDeque;

use tracing::debug;

use crate::core::error::Result;
use crate::core::types::TargetId;
use crate::events::{EventSink, SimEvent};
use crate::grid::hex::Point2D;
use crate::targets::{PathFindingTarget, TargetContext, TargetRegistry};
use crate::units::group::{GroupMode, GroupMoved, UnitGroup};
use crate::units::registry::GroupRegistry;

/// Progress at which a group commits to the tile it is entering
pub const COMMIT_PROGRESS: f32 = 0.5;

/// What happened to one group during one advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementResult {
    /// Logical position change, if the group committed to a new tile
    pub moved: Option<GroupMoved>,
    /// A step reached progress 1 this tick
    pub step_completed: bool,
    /// The target reported fulfilment and was cleared together with the path
    pub target_fulfilled: bool,
    /// The target failed a query and was dropped
    pub target_dropped: bool,
}

/// Drop leading waypoints equal to the current tile; returns how many went
pub fn normalize_path(path: &mut VecDeque<Point2D>, position: Point2D) -> usize {
    let mut dropped = 0;
    while path.front() == Some(&position) {
        path.pop_front();
        dropped += 1;
    }
    dropped
}

/// Advance one group by `dt` seconds
///
/// Halted groups, groups in battle and defeated groups are left untouched.
/// Target faults clear the group's target; they never fail the advance.
pub fn advance_group_movement(
    group: &mut UnitGroup,
    mut target: Option<&mut dyn PathFindingTarget>,
    ctx: &TargetContext,
    dt: f32,
) -> MovementResult {
    let mut result = MovementResult::default();
    if group.halted || group.mode != GroupMode::Moving || group.is_defeated() {
        return result;
    }

    // At rest: pick the next step
    if group.step_progress <= 0.0 && !group.path.is_empty() {
        normalize_path(&mut group.path, group.position);

        if !group.path.is_empty() {
            if let Some(t) = target.as_deref_mut() {
                if let Err(err) = replan_if_moved(group, t, ctx) {
                    debug!(group = %group.id, "dropping target: {err}");
                    group.clear_target();
                    target = None;
                    result.target_dropped = true;
                }
            }
        }

        if let Some(&head) = group.path.front() {
            group.end_position = head;
        }
    }

    // Clearing the path freezes the transition where it is
    if group.end_position == group.start_position || group.path.is_empty() {
        return result;
    }

    group.step_progress += group.move_speed * dt;

    if group.step_progress >= COMMIT_PROGRESS && group.position != group.end_position {
        let old_pos = group.start_position;
        group.position = group.end_position;
        result.moved = Some(GroupMoved {
            group: group.id,
            old_pos,
            new_pos: group.position,
        });
    }

    if group.step_progress >= 1.0 {
        group.start_position = group.end_position;
        group.step_progress = 0.0;
        result.step_completed = true;

        if let Some(t) = target {
            match t.is_fulfilled(group, ctx) {
                Ok(true) => {
                    debug!(group = %group.id, position = %group.position, "target reached");
                    group.clear_target();
                    group.clear_path();
                    result.target_fulfilled = true;
                }
                Ok(false) => {}
                Err(err) => {
                    debug!(group = %group.id, "dropping target: {err}");
                    group.clear_target();
                    result.target_dropped = true;
                }
            }
        }
    }

    result
}

fn replan_if_moved(
    group: &mut UnitGroup,
    target: &mut dyn PathFindingTarget,
    ctx: &TargetContext,
) -> Result<()> {
    if target.has_location_changed(ctx)? {
        let path = target.path_to_target(group.position, ctx)?;
        group.set_path(path);
        let dropped = normalize_path(&mut group.path, group.position);
        debug!(
            group = %group.id,
            waypoints = group.path.len(),
            dropped,
            "replanned towards moved target"
        );
    }
    Ok(())
}

/// Drives every moving group and publishes `UnitMoved` into its sink
#[derive(Debug)]
pub struct MovementController<S: EventSink> {
    sink: S,
}

impl<S: EventSink> MovementController<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Advance every group in id order; returns the position changes published
    pub fn advance(
        &mut self,
        groups: &mut GroupRegistry,
        targets: &mut TargetRegistry,
        ctx: &TargetContext,
        dt: f32,
    ) -> Vec<GroupMoved> {
        let mut moves = Vec::new();

        for id in groups.ids_sorted() {
            let Some(group) = groups.get_mut(id) else {
                continue;
            };

            let target = match group.target() {
                Some(target_id) => {
                    let found = targets.get_mut(target_id);
                    if found.is_none() {
                        debug!(group = %id, target = %target_id, "target gone, clearing");
                        group.clear_target();
                    }
                    found
                }
                None => None,
            };

            let result = advance_group_movement(group, target, ctx, dt);
            if let Some(moved) = result.moved {
                self.publish_move(moved);
                moves.push(moved);
            }
        }

        moves
    }

    /// Put a group on a tile immediately, cancelling any transition
    pub fn teleport(&mut self, group: &mut UnitGroup, to: Point2D) -> GroupMoved {
        let moved = group.set_position(to);
        self.publish_move(moved);
        moved
    }

    /// Steer a group towards a target, planning its path right away
    ///
    /// While a step is in flight the path is planned from the tile being
    /// entered, so the step finishes before the new route begins.
    pub fn assign_target(
        &mut self,
        group: &mut UnitGroup,
        id: TargetId,
        target: &mut dyn PathFindingTarget,
        ctx: &TargetContext,
    ) -> Result<()> {
        let from = if group.step_progress > 0.0 {
            group.end_position
        } else {
            group.position
        };
        let path = target.path_to_target(from, ctx)?;
        group.set_path(path);
        group.target = Some(id);

        if group.step_progress <= 0.0 {
            normalize_path(&mut group.path, group.position);
            if group.path.is_empty() && target.is_fulfilled(group, ctx)? {
                group.clear_target();
            }
        }
        Ok(())
    }

    fn publish_move(&mut self, moved: GroupMoved) {
        self.sink.publish(SimEvent::UnitMoved {
            new_pos: moved.new_pos,
            old_pos: moved.old_pos,
            unit: moved.group,
        });
    }
}
