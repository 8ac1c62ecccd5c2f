//! Units and unit groups

pub mod group;
pub mod registry;
pub mod unit;

pub use group::{Alignment, GroupMode, GroupMoved, RosterSpec, UnitGroup};
pub use registry::{GroupRegistry, GroupSnapshot};
pub use unit::{SingleUnit, UnitKind};
