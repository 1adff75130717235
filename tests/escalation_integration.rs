//! Detection and boss escalation integration tests

use proptest::prelude::*;

use rogue_signal::escalation::{DetectionMeter, DETECTION_MAX};
use rogue_signal::grid::GridMap;
use rogue_signal::sentinel::{Archetype, Awareness};
use rogue_signal::simulation::{RunState, TurnEvent};
use rogue_signal::{Position, RunConfig};

fn quiet_run(detection: i32, cadence: u32) -> RunState {
    let mut run = RunState::with_map(
        RunConfig::default(),
        GridMap::new(40, 40),
        Position::new(5, 5),
        Vec::new(),
        99,
    );
    run.detection = DetectionMeter::new(detection);
    run.params.passive_cadence = cadence;
    run
}

proptest! {
    #[test]
    fn test_detection_stays_in_range(
        start in -50i32..150,
        deltas in prop::collection::vec(-200i32..200, 0..50),
    ) {
        let mut meter = DetectionMeter::new(start);
        prop_assert!((0..=DETECTION_MAX).contains(&meter.level()));
        for delta in deltas {
            meter.add(delta);
            prop_assert!((0..=DETECTION_MAX).contains(&meter.level()));
        }
    }
}

#[test]
fn test_passive_trickle_crosses_threshold_then_boss_arrives() {
    let mut run = quiet_run(89, 15);

    for _ in 0..15 {
        run.wait().unwrap();
    }
    assert_eq!(run.detection_level(), 90);
    assert!(run.boss().is_none());

    let report = run.wait().unwrap();
    let spawned: Vec<_> = report
        .events
        .iter()
        .filter(|e| matches!(e, TurnEvent::BossSpawned { .. }))
        .collect();
    assert_eq!(spawned.len(), 1);
    let boss = run.boss().expect("boss on the map");
    assert_eq!(boss.archetype, Archetype::Admin);
    assert!(run.boss_spawned);
}

#[test]
fn test_boss_spawn_is_legal_and_alerted() {
    let mut run = quiet_run(95, 20);
    run.wait().unwrap();

    let boss = run.boss().expect("boss on the map");
    assert!(run.map.is_walkable(boss.pos));
    assert!(!run.map.has_feature(boss.pos));
    assert!(boss.pos.distance(&run.intruder.pos) > 1);
    assert_eq!(boss.awareness, Awareness::Hostile);
    assert_eq!(boss.last_known, Some(Position::new(5, 5)));
}

#[test]
fn test_boss_never_respawns_on_the_same_level() {
    let mut run = quiet_run(100, 20);
    let mut spawns = 0;
    for _ in 0..40 {
        let report = run.wait().unwrap();
        spawns += report
            .events
            .iter()
            .filter(|e| matches!(e, TurnEvent::BossSpawned { .. }))
            .count();
        run.sentinels.retain(|s| !s.is_boss());
        if run.is_over() {
            break;
        }
    }
    assert_eq!(spawns, 1);
}

#[test]
fn test_new_level_rearms_the_boss() {
    let mut run = RunState::new(RunConfig::default(), 12).unwrap();
    run.boss_spawned = true;
    run.advance_level().unwrap();
    assert!(!run.boss_spawned);
    assert_eq!(run.level, 2);
}
