//! Turn scheduler - one ordered, non-interruptible pass per call
//!
//! Order per turn:
//! 1. advance the turn counter
//! 2. decay timed effects
//! 3. base heat decay
//! 4. scan timer decay
//! 5. special tile under the intruder (cooling, restore, pickup)
//! 6. sentinel awareness, then movement, then contact damage
//! 7. boss spawn check
//! 8. passive detection trickle
//!
//! Integrity depletion is left to the command layer.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::abilities::AbilityId;
use crate::core::types::{Position, SentinelId, Turn};
use crate::escalation::{choose_boss_spawn, passive_trickle_due};
use crate::grid::pickup::{PatchColor, PatchEffect, Pickup};
use crate::intruder::StatusKind;
use crate::sentinel::{
    sentinel_observes, update_awareness, update_movement, Archetype, Awareness, Blockers, Sentinel,
};
use crate::simulation::run_state::{RunOutcome, RunState};

/// Events generated by commands and the scheduler
///
/// The unformatted equivalent of a message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    // === INTRUDER ACTIONS ===
    Moved {
        from: Position,
        to: Position,
    },
    /// Moved while at the heat ceiling
    Overheated {
        damage: i32,
    },
    Attacked {
        target: SentinelId,
        damage: i32,
    },
    SentinelDestroyed {
        id: SentinelId,
        archetype: Archetype,
        /// Detection added for the kill
        surcharge: i32,
    },
    AbilityUsed {
        ability: AbilityId,
        heat: i32,
    },
    Teleported {
        from: Position,
        to: Position,
    },
    NoiseMade {
        at: Position,
        drawn: Vec<SentinelId>,
    },
    SentinelsDisabled {
        ids: Vec<SentinelId>,
        turns: u32,
    },
    ScanStarted {
        turns: u32,
    },
    PatchUsed {
        color: PatchColor,
        effect: PatchEffect,
        /// First time this colour was identified
        discovered: bool,
    },
    AbilityEquipped(AbilityId),
    AbilityUnequipped(AbilityId),
    DetectionReduced {
        amount: i32,
    },
    LevelAdvanced {
        level: u32,
        name: String,
    },
    RunCompleted,
    RunFailed,

    // === SCHEDULER ===
    EffectExpired(StatusKind),
    ScanExpired,
    HeatVented {
        amount: i32,
    },
    IntegrityRestored {
        amount: i32,
    },
    PickupCollected(Pickup),
    SentinelSuspicious(SentinelId),
    SentinelHostile {
        id: SentinelId,
        spike: i32,
    },
    SentinelCalmed(SentinelId),
    SentinelReactivated(SentinelId),
    ContactDamage {
        from: SentinelId,
        damage: i32,
    },
    BossSpawned {
        id: SentinelId,
        at: Position,
    },
    PassiveTrace {
        amount: i32,
    },
}

/// What one command produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn counter after the command
    pub turn: Turn,
    /// False for free actions and banked speed moves
    pub turn_processed: bool,
    pub events: Vec<TurnEvent>,
}

impl TurnReport {
    pub fn has(&self, predicate: impl Fn(&TurnEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

/// Run one full scheduler pass, appending events
pub fn process_turn(run: &mut RunState, events: &mut Vec<TurnEvent>) {
    run.turn += 1;

    for kind in run.intruder.effects.decay() {
        events.push(TurnEvent::EffectExpired(kind));
    }

    let decay = if run.intruder.is_efficient() {
        run.config.heat_decay_efficient
    } else {
        run.config.heat_decay
    };
    run.intruder.cool(decay);

    if run.scan_turns > 0 {
        run.scan_turns -= 1;
        if run.scan_turns == 0 {
            events.push(TurnEvent::ScanExpired);
        }
    }

    apply_tile_effects(run, events);
    update_sentinels(run, events);
    check_boss_spawn(run, events);

    if passive_trickle_due(run.turn, run.params.passive_cadence) {
        let applied = run.detection.add(run.config.passive_trickle);
        if applied > 0 {
            events.push(TurnEvent::PassiveTrace { amount: applied });
        }
    }

    debug!(
        turn = run.turn,
        detection = run.detection.level(),
        heat = run.intruder.heat,
        integrity = run.intruder.integrity,
        "turn processed"
    );
}

fn apply_tile_effects(run: &mut RunState, events: &mut Vec<TurnEvent>) {
    let pos = run.intruder.pos;

    if run.map.is_cooling(pos) {
        let shed = run.intruder.cool(run.config.cooling_relief);
        if shed > 0 {
            events.push(TurnEvent::HeatVented { amount: shed });
        }
    }
    if run.map.is_restore(pos) {
        let restored = run.intruder.heal(run.config.restore_amount);
        if restored > 0 {
            events.push(TurnEvent::IntegrityRestored { amount: restored });
        }
    }
    if let Some(pickup) = run.map.take_pickup(pos) {
        run.intruder.inventory.push(pickup);
        events.push(TurnEvent::PickupCollected(pickup));
    }
}

/// Awareness for every sentinel, then movement, then contact
fn update_sentinels(run: &mut RunState, events: &mut Vec<TurnEvent>) {
    let intruder_pos = run.intruder.pos;

    for i in 0..run.sentinels.len() {
        if run.sentinels[i].is_disabled() {
            continue;
        }
        let observed = sentinel_observes(&run.sentinels[i], &run.intruder, &run.map);
        let sentinel = &mut run.sentinels[i];
        let update = update_awareness(sentinel, observed, intruder_pos, &run.config, &mut run.rng);
        if update.detection > 0 {
            run.detection.add(update.detection);
        }
        if let Some((before, after)) = update.transition {
            debug!(id = %sentinel.id, ?before, ?after, "awareness changed");
            events.push(match after {
                Awareness::Suspicious => TurnEvent::SentinelSuspicious(sentinel.id),
                Awareness::Hostile => TurnEvent::SentinelHostile {
                    id: sentinel.id,
                    spike: update.detection,
                },
                Awareness::Calm => TurnEvent::SentinelCalmed(sentinel.id),
            });
        }
    }

    let mut occupied: AHashSet<Position> = run.sentinels.iter().map(|s| s.pos).collect();
    for i in 0..run.sentinels.len() {
        let from = run.sentinels[i].pos;
        occupied.remove(&from);
        let blockers = Blockers {
            map: &run.map,
            intruder: intruder_pos,
            sentinels: &occupied,
        };
        let result = update_movement(&mut run.sentinels[i], &blockers, &mut run.rng);
        occupied.insert(run.sentinels[i].pos);
        if result.reactivated {
            events.push(TurnEvent::SentinelReactivated(run.sentinels[i].id));
        }
    }

    for sentinel in &run.sentinels {
        if sentinel.is_disabled() || !sentinel.pos.is_adjacent(&intruder_pos) {
            continue;
        }
        let damage = sentinel.profile().contact_damage;
        run.intruder.take_damage(damage);
        events.push(TurnEvent::ContactDamage {
            from: sentinel.id,
            damage,
        });
    }
}

/// Spawn the boss once per level when detection crosses the threshold
fn check_boss_spawn(run: &mut RunState, events: &mut Vec<TurnEvent>) {
    if run.boss_spawned
        || !run.detection.reached(run.config.boss_threshold)
        || run.sentinels.iter().any(Sentinel::is_boss)
    {
        return;
    }

    let Some(at) = choose_boss_spawn(
        &run.map,
        run.intruder.pos,
        &run.sentinels,
        &run.config,
        &mut run.rng,
    ) else {
        return;
    };

    let id = run.allocate_sentinel_id();
    let mut boss = Sentinel::new(id, Archetype::Admin, at);
    boss.alert(run.intruder.pos);
    run.sentinels.push(boss);
    run.boss_spawned = true;

    info!(%id, %at, detection = run.detection.level(), "boss spawned");
    events.push(TurnEvent::BossSpawned { id, at });
}

/// Mark the run failed once integrity is gone
pub(crate) fn check_failure(run: &mut RunState, events: &mut Vec<TurnEvent>) {
    if run.outcome == RunOutcome::InProgress && !run.intruder.is_alive() {
        run.outcome = RunOutcome::Failed;
        info!(turn = run.turn, level = run.level, "intruder lost");
        events.push(TurnEvent::RunFailed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RunConfig;
    use crate::grid::map::GridMap;
    use crate::intruder::StatusKind;

    fn open_run(sentinels: Vec<Sentinel>) -> RunState {
        RunState::with_map(
            RunConfig::default(),
            GridMap::new(40, 40),
            Position::new(5, 5),
            sentinels,
            7,
        )
    }

    #[test]
    fn test_heat_and_effects_decay() {
        let mut run = open_run(Vec::new());
        run.intruder.heat = 10;
        run.intruder.effects.grant(StatusKind::Invisibility, 1);
        let mut events = Vec::new();
        process_turn(&mut run, &mut events);
        assert_eq!(run.turn, 1);
        assert_eq!(run.intruder.heat, 8);
        assert!(events.contains(&TurnEvent::EffectExpired(StatusKind::Invisibility)));
    }

    #[test]
    fn test_efficiency_speeds_cooling() {
        let mut run = open_run(Vec::new());
        run.intruder.heat = 10;
        run.intruder.effects.grant(StatusKind::AbilityEfficiency, 5);
        process_turn(&mut run, &mut Vec::new());
        assert_eq!(run.intruder.heat, 7);
    }

    #[test]
    fn test_scan_expires_exactly_once() {
        let mut run = open_run(Vec::new());
        run.scan_turns = 2;
        let mut events = Vec::new();
        process_turn(&mut run, &mut events);
        assert!(!events.contains(&TurnEvent::ScanExpired));
        process_turn(&mut run, &mut events);
        process_turn(&mut run, &mut events);
        assert_eq!(events.iter().filter(|e| **e == TurnEvent::ScanExpired).count(), 1);
    }

    #[test]
    fn test_cooling_and_restore_nodes() {
        let mut run = open_run(Vec::new());
        run.map.add_cooling(Position::new(5, 5));
        run.intruder.heat = 50;
        process_turn(&mut run, &mut Vec::new());
        assert_eq!(run.intruder.heat, 28);

        let mut run = open_run(Vec::new());
        run.map.add_restore(Position::new(5, 5));
        run.intruder.integrity = 95;
        let mut events = Vec::new();
        process_turn(&mut run, &mut events);
        assert_eq!(run.intruder.integrity, 100);
        assert!(events.contains(&TurnEvent::IntegrityRestored { amount: 5 }));
    }

    #[test]
    fn test_pickup_moves_to_inventory() {
        let mut run = open_run(Vec::new());
        let pickup = Pickup::Ability(AbilityId::EmpBurst);
        run.map.place_pickup(Position::new(5, 5), pickup);
        process_turn(&mut run, &mut Vec::new());
        assert_eq!(run.intruder.inventory, vec![pickup]);
        assert!(run.map.pickup_at(Position::new(5, 5)).is_none());
    }

    #[test]
    fn test_adjacent_sentinel_deals_contact_damage() {
        let s = Sentinel::new(SentinelId::new(1), Archetype::Firewall, Position::new(6, 5));
        let mut run = open_run(vec![s]);
        process_turn(&mut run, &mut Vec::new());
        assert_eq!(run.intruder.integrity, 92);
    }

    #[test]
    fn test_disabled_sentinel_is_harmless() {
        let mut s = Sentinel::new(SentinelId::new(1), Archetype::Firewall, Position::new(6, 5));
        s.disable(3);
        let mut run = open_run(vec![s]);
        process_turn(&mut run, &mut Vec::new());
        assert_eq!(run.intruder.integrity, 100);
        assert_eq!(run.sentinels[0].awareness, Awareness::Calm);
        assert_eq!(run.sentinels[0].disabled_turns, 2);
    }

    #[test]
    fn test_boss_spawns_once_per_level() {
        let mut run = open_run(Vec::new());
        run.detection.add(95);
        let mut events = Vec::new();
        process_turn(&mut run, &mut events);
        let boss = run.boss().expect("boss spawned").clone();
        assert_eq!(boss.awareness, Awareness::Hostile);
        assert_eq!(boss.last_known, Some(Position::new(5, 5)));
        assert!(run.map.is_walkable(boss.pos));

        run.sentinels.clear();
        process_turn(&mut run, &mut events);
        assert!(run.boss().is_none());
        let spawns = events
            .iter()
            .filter(|e| matches!(e, TurnEvent::BossSpawned { .. }))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn test_passive_trickle_on_cadence() {
        let mut run = open_run(Vec::new());
        run.params.passive_cadence = 3;
        for _ in 0..6 {
            process_turn(&mut run, &mut Vec::new());
        }
        assert_eq!(run.detection.level(), 2);
    }

    #[test]
    fn test_failure_is_flagged_once() {
        let mut run = open_run(Vec::new());
        run.intruder.take_damage(200);
        let mut events = Vec::new();
        check_failure(&mut run, &mut events);
        check_failure(&mut run, &mut events);
        assert_eq!(run.outcome, RunOutcome::Failed);
        assert_eq!(events, vec![TurnEvent::RunFailed]);
    }
}
