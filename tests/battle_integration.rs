//! Battle integration tests

use finger_god::battle::BattleController;
use finger_god::core::config::UnitStats;
use finger_god::core::types::{GroupId, OwnerId};
use finger_god::core::{SimError, SimulationConfig};
use finger_god::events::{BattleResult, EventLog, SimEvent};
use finger_god::grid::hex::Point2D;
use finger_god::grid::map::TileMap;
use finger_god::presentation::{attach_visuals, RecordingVisuals};
use finger_god::simulation::Simulation;
use finger_god::units::{GroupMode, GroupRegistry, SingleUnit, UnitKind};

fn roster(count: usize, health: f32, attack: f32) -> Vec<SingleUnit> {
    (0..count)
        .map(|_| SingleUnit::new(UnitKind::Person, UnitStats::new(health, attack)))
        .collect()
}

fn registry_with(a: Vec<SingleUnit>, b: Vec<SingleUnit>) -> (GroupRegistry, GroupId, GroupId) {
    let mut groups = GroupRegistry::new();
    let a = groups.spawn(Some(OwnerId(1)), Point2D::new(2, 2), a, 1.0);
    let b = groups.spawn(Some(OwnerId(2)), Point2D::new(2, 2), b, 1.0);
    (groups, a, b)
}

#[test]
fn test_simultaneous_exchange_kills_attackers_and_defender() {
    let (mut groups, a, b) = registry_with(roster(3, 10.0, 5.0), roster(1, 10.0, 100.0));
    let mut battles = BattleController::new(EventLog::new(), 0.25);
    battles.start(&mut groups, a, b).unwrap();

    let ended = battles
        .advance(&mut groups, &mut RecordingVisuals::new(), 0.25)
        .unwrap();

    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].result, BattleResult::Tie);
    assert_eq!(groups.get(a).unwrap().headcount(), 0);
    assert_eq!(groups.get(b).unwrap().headcount(), 0);
}

#[test]
fn test_single_units_trading_lethal_blows_tie() {
    let (mut groups, a, b) = registry_with(roster(1, 10.0, 10.0), roster(1, 10.0, 10.0));
    let mut battles = BattleController::new(EventLog::new(), 0.25);
    let session = battles.start(&mut groups, a, b).unwrap();

    let ended = battles
        .advance(&mut groups, &mut RecordingVisuals::new(), 0.25)
        .unwrap();

    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].session, session);
    assert_eq!(ended[0].result, BattleResult::Tie);
    assert_eq!(battles.sink().battle_ends(), vec![(BattleResult::Tie, a, b)]);
    assert_eq!(groups.get(a).unwrap().headcount(), 0);
    assert_eq!(groups.get(b).unwrap().headcount(), 0);

    let json = serde_json::to_value(&battles.sink().events()[0]).unwrap();
    assert_eq!(json["result"], "tie");
}

#[test]
fn test_large_dt_runs_every_due_exchange() {
    let (mut groups, a, b) = registry_with(roster(1, 100.0, 2.0), roster(1, 100.0, 3.0));
    let mut battles = BattleController::new(EventLog::new(), 0.25);
    let session = battles.start(&mut groups, a, b).unwrap();

    battles
        .advance(&mut groups, &mut RecordingVisuals::new(), 0.75)
        .unwrap();

    assert_eq!(battles.session(session).unwrap().exchanges, 3);
    assert_eq!(groups.get(a).unwrap().units()[0].health(), 91.0);
    assert_eq!(groups.get(b).unwrap().units()[0].health(), 94.0);
}

#[test]
fn test_remainder_carries_between_ticks() {
    let (mut groups, a, b) = registry_with(roster(1, 100.0, 1.0), roster(1, 100.0, 1.0));
    let mut battles = BattleController::new(EventLog::new(), 0.25);
    let session = battles.start(&mut groups, a, b).unwrap();
    let mut visuals = RecordingVisuals::new();

    // 0.375 twice is 0.75: three exchanges in total, split 1 + 2
    battles.advance(&mut groups, &mut visuals, 0.375).unwrap();
    assert_eq!(battles.session(session).unwrap().exchanges, 1);
    battles.advance(&mut groups, &mut visuals, 0.375).unwrap();
    assert_eq!(battles.session(session).unwrap().exchanges, 3);
    assert_eq!(battles.session(session).unwrap().elapsed, 0.0);
}

#[test]
fn test_battle_end_published_once() {
    let (mut groups, a, b) = registry_with(roster(1, 10.0, 1.0), roster(4, 10.0, 5.0));
    let mut battles = BattleController::new(EventLog::new(), 0.25);
    battles.start(&mut groups, a, b).unwrap();
    let mut visuals = RecordingVisuals::new();

    battles.advance(&mut groups, &mut visuals, 5.0).unwrap();
    battles.advance(&mut groups, &mut visuals, 5.0).unwrap();

    assert_eq!(
        battles.sink().battle_ends(),
        vec![(BattleResult::BWin, a, b)]
    );
    assert_eq!(battles.active_count(), 0);
}

#[test]
fn test_casualty_visuals_are_released() {
    let (mut groups, a, b) = registry_with(roster(2, 10.0, 1.0), roster(2, 5.0, 1.0));
    let mut visuals = RecordingVisuals::new();
    for id in [a, b] {
        attach_visuals(groups.get_mut(id).unwrap(), &mut visuals);
    }

    let mut battles = BattleController::new(EventLog::new(), 0.25);
    battles.start(&mut groups, a, b).unwrap();
    battles.advance(&mut groups, &mut visuals, 10.0).unwrap();

    // B loses one hit point per unit each exchange and falls after five
    assert_eq!(visuals.live_for(b), 0);
    assert_eq!(visuals.live_for(a), 2);
    assert_eq!(visuals.removed().len(), 2);
}

#[test]
fn test_missing_group_is_reported() {
    let (mut groups, a, b) = registry_with(roster(1, 10.0, 1.0), roster(1, 10.0, 1.0));
    let mut battles = BattleController::new(EventLog::new(), 0.25);
    battles.start(&mut groups, a, b).unwrap();
    groups.remove(a);

    let result = battles.advance(&mut groups, &mut RecordingVisuals::new(), 0.25);
    assert!(matches!(result, Err(SimError::BattleGroupMissing { .. })));
}

#[test]
fn test_survivor_returns_to_moving_and_continues() {
    let mut sim = Simulation::new(TileMap::new(8, 8), SimulationConfig::default());
    let attacker = sim
        .spawn_group_with(Some(OwnerId(1)), Point2D::new(0, 0), roster(4, 20.0, 5.0), 1.0)
        .unwrap();
    let defender = sim
        .spawn_group_with(Some(OwnerId(2)), Point2D::new(1, 0), roster(2, 10.0, 2.0), 1.0)
        .unwrap();
    sim.push_waypoint(attacker, Point2D::new(1, 0)).unwrap();
    sim.push_waypoint(attacker, Point2D::new(2, 0)).unwrap();

    // Tick 2 commits onto the defender's tile and the first exchange follows
    // at once: 4 strikes of 5 split over 2 defenders, 2 strikes of 2 split over 4
    let events = sim.run(2, 0.25).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::BattleEnd { result: BattleResult::AWin, group_a, group_b }
            if *group_a == attacker && *group_b == defender
    )));
    assert!(sim.group(defender).is_none());
    assert!(!sim.battles().is_engaged(attacker));
    let group = sim.group(attacker).unwrap();
    assert_eq!(group.mode, GroupMode::Moving);
    assert_eq!(group.position(), Point2D::new(1, 0));
    assert!(group.units().iter().all(|u| u.health() == 19.0));

    sim.run(20, 0.25).unwrap();
    assert!(sim.group(defender).is_none());
    let group = sim.group(attacker).unwrap();
    assert_eq!(group.mode, GroupMode::Moving);
    assert_eq!(group.position(), Point2D::new(2, 0));
}

#[test]
fn test_neutral_groups_do_not_fight_each_other() {
    let mut sim = Simulation::new(TileMap::new(6, 6), SimulationConfig::default());
    let a = sim
        .spawn_group_with(None, Point2D::new(0, 0), roster(1, 10.0, 1.0), 1.0)
        .unwrap();
    sim.spawn_group_with(None, Point2D::new(1, 0), roster(1, 10.0, 1.0), 1.0)
        .unwrap();
    sim.push_waypoint(a, Point2D::new(1, 0)).unwrap();

    let events = sim.run(8, 0.25).unwrap();
    assert!(!events.iter().any(|e| matches!(e, SimEvent::BattleEnd { .. })));
    assert_eq!(sim.groups().len(), 2);
}

#[test]
fn test_battle_end_json_line() {
    let mut sim = Simulation::new(TileMap::new(4, 4), SimulationConfig::default());
    let a = sim
        .spawn_group_with(Some(OwnerId(1)), Point2D::new(0, 0), roster(1, 10.0, 50.0), 1.0)
        .unwrap();
    sim.spawn_group_with(Some(OwnerId(2)), Point2D::new(1, 0), roster(1, 10.0, 1.0), 1.0)
        .unwrap();
    sim.push_waypoint(a, Point2D::new(1, 0)).unwrap();

    let events = sim.run(2, 0.25).unwrap();
    let end = events
        .iter()
        .find(|e| e.name() == "BattleEnd")
        .expect("battle should end on the commit tick");
    let json = serde_json::to_value(end).unwrap();
    assert_eq!(json["result"], "awin");
    assert_eq!(json["groupA"], a.0);
}
