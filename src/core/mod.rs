pub mod config;
pub mod error;
pub mod types;

pub use config::{SimulationConfig, UnitStats};
pub use error::{Result, SimError};
