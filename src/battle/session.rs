//! Battle session state

use serde::{Deserialize, Serialize};

use crate::core::types::{GroupId, SessionId};
use crate::events::BattleResult;

/// A fight between two groups, referenced by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSession {
    pub id: SessionId,
    pub group_a: GroupId,
    pub group_b: GroupId,
    /// Simulated time not yet spent on exchanges
    pub elapsed: f32,
    pub active: bool,
    pub exchanges: u32,
    pub result: Option<BattleResult>,
}

impl BattleSession {
    pub fn new(id: SessionId, group_a: GroupId, group_b: GroupId) -> Self {
        Self {
            id,
            group_a,
            group_b,
            elapsed: 0.0,
            active: true,
            exchanges: 0,
            result: None,
        }
    }

    pub fn involves(&self, group: GroupId) -> bool {
        self.group_a == group || self.group_b == group
    }

    /// Add tick time to the accumulator
    pub fn accumulate(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    /// Spend one interval if enough time has built up
    pub fn take_exchange(&mut self, interval: f32) -> bool {
        if !self.active || self.elapsed < interval {
            return false;
        }
        self.elapsed -= interval;
        self.exchanges += 1;
        true
    }

    /// Active -> Inactive; the only transition a session makes
    pub fn finish(&mut self, result: BattleResult) {
        self.active = false;
        self.result = Some(result);
    }
}
