//! Enemy-tracking target

use crate::core::error::{Result, SimError};
use crate::core::types::GroupId;
use crate::grid::hex::Point2D;
use crate::targets::{PathFindingTarget, TargetContext};
use crate::units::group::UnitGroup;

/// Chase an enemy group until it is gone or caught
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyTarget {
    pub enemy: GroupId,
    /// Where the enemy stood when the current path was planned
    planned_to: Option<Point2D>,
}

impl EnemyTarget {
    pub fn new(enemy: GroupId) -> Self {
        Self {
            enemy,
            planned_to: None,
        }
    }

    /// Live position of the enemy, `None` once it is gone or defeated
    pub fn enemy_position(&self, ctx: &TargetContext) -> Option<Point2D> {
        ctx.group(self.enemy)
            .filter(|g| g.living > 0)
            .map(|g| g.position)
    }

    pub fn planned_to(&self) -> Option<Point2D> {
        self.planned_to
    }
}

impl PathFindingTarget for EnemyTarget {
    fn path_to_target(&mut self, from: Point2D, ctx: &TargetContext) -> Result<Vec<Point2D>> {
        let to = self
            .enemy_position(ctx)
            .ok_or(SimError::GroupNotFound(self.enemy))?;
        let path = ctx
            .map
            .find_path(from, to)
            .ok_or(SimError::NoPath { from, to })?;
        self.planned_to = Some(to);
        Ok(path)
    }

    fn has_location_changed(&self, ctx: &TargetContext) -> Result<bool> {
        // A vanished enemy is handled by `is_fulfilled`, keep walking until then
        Ok(match self.enemy_position(ctx) {
            Some(position) => self.planned_to != Some(position),
            None => false,
        })
    }

    fn is_fulfilled(&self, group: &UnitGroup, ctx: &TargetContext) -> Result<bool> {
        Ok(match self.enemy_position(ctx) {
            Some(position) => group.position() == position,
            None => true,
        })
    }
}
