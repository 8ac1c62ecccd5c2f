//! Hex grid: axial coordinates, world-space layout and the tile map

pub mod hex;
pub mod map;

pub use hex::{interpolate_world, Point2D};
pub use map::{Terrain, TileMap};
