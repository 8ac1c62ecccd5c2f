//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Unique identifier for unit groups, stable for the lifetime of the group
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "group#{}", _0)]
pub struct GroupId(pub u32);

/// Identifier of the player (or faction) that owns a group
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "owner#{}", _0)]
pub struct OwnerId(pub u32);

impl OwnerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Identifier of a path-finding target held in the target registry
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "target#{}", _0)]
pub struct TargetId(pub u32);

/// Identifier of a battle session
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "battle#{}", _0)]
pub struct SessionId(pub u32);

/// Opaque handle to a visual instance owned by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Simulation tick counter
pub type Tick = u64;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_group_id_ordering() {
        assert!(GroupId(1) < GroupId(2));
        assert_eq!(GroupId(3), GroupId(3));
    }

    #[test]
    fn test_ids_display() {
        assert_eq!(GroupId(4).to_string(), "group#4");
        assert_eq!(OwnerId::new(2).to_string(), "owner#2");
        assert_eq!(TargetId(9).to_string(), "target#9");
        assert_eq!(SessionId(1).to_string(), "battle#1");
    }

    #[test]
    fn test_owner_id_hash() {
        let mut map: HashMap<OwnerId, &str> = HashMap::new();
        map.insert(OwnerId(1), "player");
        assert_eq!(map.get(&OwnerId(1)), Some(&"player"));
    }
}
