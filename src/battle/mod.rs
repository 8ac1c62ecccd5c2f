//! Battles - two groups on one tile trading simultaneous blows
//!
//! Battles run on their own clock: every attack interval of simulated time
//! both groups strike at once, the fallen are removed, and the session ends
//! when at least one side has nobody left standing.

pub mod controller;
pub mod exchange;
pub mod session;

pub use controller::{BattleController, BattleEnded};
pub use exchange::{battle_outcome, resolve_exchange, ExchangeReport};
pub use session::BattleSession;
