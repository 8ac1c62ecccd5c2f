//! Individual combatants

use serde::{Deserialize, Serialize};

use crate::core::config::UnitStats;
use crate::core::types::VisualHandle;

/// The kinds of combatant a group can field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitKind {
    #[default]
    Person,
    Follower,
    DemiGod,
}

/// One combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleUnit {
    pub kind: UnitKind,
    health: f32,
    max_health: f32,
    pub attack: f32,
    /// Visual instance, owned by the presentation layer
    #[serde(skip)]
    pub visual: Option<VisualHandle>,
}

impl SingleUnit {
    pub fn new(kind: UnitKind, stats: UnitStats) -> Self {
        let max_health = stats.max_health.max(0.0);
        Self {
            kind,
            health: max_health,
            max_health,
            attack: stats.attack.max(0.0),
            visual: None,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Damage this unit deals this exchange; dead units deal nothing
    pub fn strike(&self) -> Option<f32> {
        self.is_alive().then_some(self.attack)
    }

    /// Apply damage, clamped at zero. Returns true if this blow killed the unit.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        !self.is_alive()
    }

    /// Restore health up to the maximum; the dead stay dead
    pub fn heal(&mut self, amount: f32) {
        if !self.is_alive() || amount <= 0.0 {
            return;
        }
        self.health = (self.health + amount).min(self.max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> SingleUnit {
        SingleUnit::new(UnitKind::Person, UnitStats::new(10.0, 5.0))
    }

    #[test]
    fn test_new_unit_is_at_full_health() {
        let unit = person();
        assert_eq!(unit.health(), 10.0);
        assert!(unit.is_alive());
        assert_eq!(unit.strike(), Some(5.0));
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut unit = person();
        assert!(unit.take_damage(25.0));
        assert_eq!(unit.health(), 0.0);
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_killing_blow_reported_once() {
        let mut unit = person();
        assert!(!unit.take_damage(4.0));
        assert!(unit.take_damage(6.0));
        assert!(!unit.take_damage(6.0));
    }

    #[test]
    fn test_dead_unit_never_attacks_or_heals() {
        let mut unit = person();
        unit.take_damage(10.0);
        assert_eq!(unit.strike(), None);

        unit.heal(5.0);
        assert_eq!(unit.health(), 0.0);
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut unit = person();
        unit.take_damage(3.0);
        unit.heal(100.0);
        assert_eq!(unit.health(), unit.max_health());
    }
}
