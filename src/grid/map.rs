//! Tile map - the hex grid groups move across
//!
//! Provides terrain lookup and the A* search concrete targets plan with.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::hex::Point2D;

/// What stands on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Open,
    /// A building the player can interact with; groups may still pass
    Structure,
    /// Water, cliffs: never entered
    Impassable,
}

impl Terrain {
    /// Cost of entering a tile with this terrain
    pub fn movement_cost(&self) -> f32 {
        match self {
            Self::Open => 1.0,
            Self::Structure => 1.5,
            Self::Impassable => f32::INFINITY,
        }
    }

    pub fn is_passable(&self) -> bool {
        !matches!(self, Self::Impassable)
    }
}

/// Rectangular axial map, `q` in `0..width` and `r` in `0..height`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    width: i32,
    height: i32,
    terrain: AHashMap<Point2D, Terrain>,
}

impl TileMap {
    /// Create an open map
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
            terrain: AHashMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if a coordinate is within the map bounds
    pub fn contains(&self, coord: Point2D) -> bool {
        (0..self.width).contains(&coord.q) && (0..self.height).contains(&coord.r)
    }

    /// Terrain at a coordinate, `None` outside the map
    pub fn terrain(&self, coord: Point2D) -> Option<Terrain> {
        if !self.contains(coord) {
            return None;
        }
        Some(self.terrain.get(&coord).copied().unwrap_or_default())
    }

    /// Set terrain; coordinates outside the map are ignored
    pub fn set_terrain(&mut self, coord: Point2D, terrain: Terrain) {
        if !self.contains(coord) {
            return;
        }
        if terrain == Terrain::Open {
            self.terrain.remove(&coord);
        } else {
            self.terrain.insert(coord, terrain);
        }
    }

    pub fn is_passable(&self, coord: Point2D) -> bool {
        self.terrain(coord).is_some_and(|t| t.is_passable())
    }

    /// Get passable neighbors of a hex
    pub fn passable_neighbors(&self, coord: Point2D) -> impl Iterator<Item = Point2D> + '_ {
        coord
            .neighbors()
            .into_iter()
            .filter(move |n| self.is_passable(*n))
    }

    /// A* pathfinding from start to goal
    ///
    /// The returned path starts with `start` and ends with `goal`.
    /// Returns None if either end is off the map, the goal is impassable,
    /// or no route exists.
    pub fn find_path(&self, start: Point2D, goal: Point2D) -> Option<Vec<Point2D>> {
        if !self.contains(start) || !self.is_passable(goal) {
            return None;
        }

        if start == goal {
            return Some(vec![start]);
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: AHashMap<Point2D, Point2D> = AHashMap::new();
        let mut g_score: AHashMap<Point2D, f32> = AHashMap::new();
        let mut closed_set: AHashSet<Point2D> = AHashSet::new();

        g_score.insert(start, 0.0);
        // Ties on f-cost break towards the lower (q, r) for stable paths
        open_set.push(Reverse((
            OrderedFloat(start.distance(&goal) as f32),
            start.q,
            start.r,
        )));

        while let Some(Reverse((_, q, r))) = open_set.pop() {
            let current = Point2D::new(q, r);
            if current == goal {
                return Some(reconstruct_path(&came_from, goal));
            }

            if !closed_set.insert(current) {
                continue;
            }

            let current_g = g_score.get(&current).copied().unwrap_or(f32::INFINITY);
            for neighbor in self.passable_neighbors(current) {
                if closed_set.contains(&neighbor) {
                    continue;
                }

                let cost = self
                    .terrain(neighbor)
                    .map_or(f32::INFINITY, |t| t.movement_cost());
                let tentative_g = current_g + cost;

                if tentative_g < g_score.get(&neighbor).copied().unwrap_or(f32::INFINITY) {
                    came_from.insert(neighbor, current);
                    g_score.insert(neighbor, tentative_g);
                    let f_cost = tentative_g + neighbor.distance(&goal) as f32;
                    open_set.push(Reverse((OrderedFloat(f_cost), neighbor.q, neighbor.r)));
                }
            }
        }

        None
    }
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &AHashMap<Point2D, Point2D>, mut current: Point2D) -> Vec<Point2D> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(path: &[Point2D]) {
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1, "gap between {} and {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_bounds() {
        let map = TileMap::new(4, 3);
        assert!(map.contains(Point2D::new(0, 0)));
        assert!(map.contains(Point2D::new(3, 2)));
        assert!(!map.contains(Point2D::new(4, 0)));
        assert!(!map.contains(Point2D::new(0, -1)));
        assert_eq!(map.terrain(Point2D::new(9, 9)), None);
    }

    #[test]
    fn test_set_terrain() {
        let mut map = TileMap::new(5, 5);
        let hex = Point2D::new(2, 2);
        map.set_terrain(hex, Terrain::Structure);
        assert_eq!(map.terrain(hex), Some(Terrain::Structure));
        map.set_terrain(hex, Terrain::Open);
        assert_eq!(map.terrain(hex), Some(Terrain::Open));
    }

    #[test]
    fn test_pathfind_straight_line() {
        let map = TileMap::new(10, 10);
        let start = Point2D::new(0, 0);
        let goal = Point2D::new(5, 0);

        let path = map.find_path(start, goal).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.len(), 6);
        assert_contiguous(&path);
    }

    #[test]
    fn test_pathfind_same_hex() {
        let map = TileMap::new(5, 5);
        let hex = Point2D::new(2, 2);
        assert_eq!(map.find_path(hex, hex), Some(vec![hex]));
    }

    #[test]
    fn test_pathfind_around_wall() {
        let mut map = TileMap::new(8, 8);
        for r in 0..7 {
            map.set_terrain(Point2D::new(3, r), Terrain::Impassable);
        }

        let path = map.find_path(Point2D::new(0, 0), Point2D::new(6, 0)).unwrap();
        assert!(path.iter().all(|p| map.is_passable(*p)));
        assert!(path.contains(&Point2D::new(3, 7)));
        assert_contiguous(&path);
    }

    #[test]
    fn test_pathfind_blocked() {
        let mut map = TileMap::new(6, 6);
        for r in 0..6 {
            map.set_terrain(Point2D::new(2, r), Terrain::Impassable);
        }
        assert!(map.find_path(Point2D::new(0, 0), Point2D::new(5, 5)).is_none());
    }

    #[test]
    fn test_pathfind_off_map() {
        let map = TileMap::new(3, 3);
        assert!(map.find_path(Point2D::new(0, 0), Point2D::new(7, 7)).is_none());
    }

    #[test]
    fn test_structure_costs_more_than_open() {
        assert!(Terrain::Structure.movement_cost() > Terrain::Open.movement_cost());
        assert!(!Terrain::Impassable.is_passable());
    }
}
