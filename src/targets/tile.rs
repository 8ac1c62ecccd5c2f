//! Fixed-tile target

use crate::core::error::{Result, SimError};
use crate::grid::hex::Point2D;
use crate::targets::{PathFindingTarget, TargetContext};
use crate::units::group::UnitGroup;

/// Walk to a tile and stop there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileTarget {
    pub tile: Point2D,
}

impl TileTarget {
    pub fn new(tile: Point2D) -> Self {
        Self { tile }
    }
}

impl PathFindingTarget for TileTarget {
    fn path_to_target(&mut self, from: Point2D, ctx: &TargetContext) -> Result<Vec<Point2D>> {
        ctx.map.find_path(from, self.tile).ok_or(SimError::NoPath {
            from,
            to: self.tile,
        })
    }

    fn has_location_changed(&self, _ctx: &TargetContext) -> Result<bool> {
        Ok(false)
    }

    fn is_fulfilled(&self, group: &UnitGroup, _ctx: &TargetContext) -> Result<bool> {
        Ok(group.position() == self.tile)
    }
}
