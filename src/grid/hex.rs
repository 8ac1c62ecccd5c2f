//! Hex coordinate system (axial coordinates)
//!
//! Uses axial coordinates (q, r) for tile addressing and path waypoints.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axial hex coordinate of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Point2D {
    pub q: i32,
    pub r: i32,
}

impl Point2D {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Distance in hex steps
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get all 6 neighboring coordinates
    pub fn neighbors(&self) -> [Point2D; 6] {
        [
            Point2D::new(self.q + 1, self.r),
            Point2D::new(self.q + 1, self.r - 1),
            Point2D::new(self.q, self.r - 1),
            Point2D::new(self.q - 1, self.r),
            Point2D::new(self.q - 1, self.r + 1),
            Point2D::new(self.q, self.r + 1),
        ]
    }

    /// Centre of the tile on the ground plane (x, z) for flat-topped hexes of unit size
    pub fn to_world(&self) -> Vec2 {
        let q = self.q as f32;
        let r = self.r as f32;
        Vec2::new(1.5 * q, 3.0_f32.sqrt() * (r + q / 2.0))
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl From<(i32, i32)> for Point2D {
    fn from((q, r): (i32, i32)) -> Self {
        Self::new(q, r)
    }
}

/// World-space point between two tiles for a transition that is `progress` complete
pub fn interpolate_world(start: Point2D, end: Point2D, progress: f32) -> Vec2 {
    start.to_world().lerp(end.to_world(), progress)
}
