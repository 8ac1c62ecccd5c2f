//! One simultaneous attack exchange between two groups

use crate::events::BattleResult;
use crate::units::group::UnitGroup;
use crate::units::unit::SingleUnit;

/// What one exchange did
#[derive(Debug, Clone, Default)]
pub struct ExchangeReport {
    pub damage_to_a: f32,
    pub damage_to_b: f32,
    /// Units of A that fell, already removed from the roster
    pub casualties_a: Vec<SingleUnit>,
    pub casualties_b: Vec<SingleUnit>,
    /// Terminal outcome, if the exchange ended the battle
    pub outcome: Option<BattleResult>,
}

/// Terminal outcome for two groups, `None` while both still stand
pub fn battle_outcome(a: &UnitGroup, b: &UnitGroup) -> Option<BattleResult> {
    match (a.is_defeated(), b.is_defeated()) {
        (true, true) => Some(BattleResult::Tie),
        (true, false) => Some(BattleResult::BWin),
        (false, true) => Some(BattleResult::AWin),
        (false, false) => None,
    }
}

/// Resolve one exchange
///
/// Both sides' strikes are taken before any damage lands, so a unit killed
/// in this exchange still hits back.
pub fn resolve_exchange(a: &mut UnitGroup, b: &mut UnitGroup) -> ExchangeReport {
    let strikes_a = a.strikes();
    let strikes_b = b.strikes();

    b.absorb_strikes(&strikes_a);
    a.absorb_strikes(&strikes_b);

    let casualties_a = a.remove_dead();
    let casualties_b = b.remove_dead();

    ExchangeReport {
        damage_to_a: strikes_b.iter().sum(),
        damage_to_b: strikes_a.iter().sum(),
        casualties_a,
        casualties_b,
        outcome: battle_outcome(a, b),
    }
}
