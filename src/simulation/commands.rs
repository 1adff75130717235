//! Intruder commands
//!
//! Each command validates fully before touching state. A rejected command
//! returns a `CommandError` and leaves the run exactly as it was.

use tracing::{debug, info};

use crate::abilities::AbilityId;
use crate::core::error::CommandError;
use crate::core::types::{Position, SentinelId};
use crate::grid::pickup::{PatchColor, PatchEffect, Pickup};
use crate::intruder::StatusKind;
use crate::sentinel::{Archetype, Awareness, MovementStrategy};
use crate::simulation::run_state::{RunOutcome, RunState};
use crate::simulation::turn::{check_failure, process_turn, TurnEvent, TurnReport};

type CommandResult = std::result::Result<TurnReport, CommandError>;

impl RunState {
    fn ensure_running(&self) -> std::result::Result<(), CommandError> {
        if self.is_over() {
            Err(CommandError::RunOver)
        } else {
            Ok(())
        }
    }

    /// Run the scheduler after an action and wrap up the report
    fn finish(&mut self, mut events: Vec<TurnEvent>, process: bool) -> TurnReport {
        check_failure(self, &mut events);
        let processed = process && !self.is_over();
        if processed {
            process_turn(self, &mut events);
            check_failure(self, &mut events);
        }
        TurnReport {
            turn: self.turn,
            turn_processed: processed,
            events,
        }
    }

    /// Heat an ability would cost right now
    pub fn ability_heat_cost(&self, id: AbilityId) -> i32 {
        let base = id.def().heat_cost;
        if self.intruder.is_efficient() {
            (base as f32 * self.config.efficiency_heat_multiplier).floor() as i32
        } else {
            base
        }
    }

    // === MOVEMENT AND MELEE ===

    /// Step one cell, attacking any sentinel in the way
    pub fn attempt_move(&mut self, dx: i32, dy: i32) -> CommandResult {
        self.ensure_running()?;
        if dx.abs() > 1 || dy.abs() > 1 || (dx == 0 && dy == 0) {
            return Err(CommandError::InvalidDirection { dx, dy });
        }
        let target = self.intruder.pos.offset(dx, dy);
        if !self.map.in_bounds(target) {
            return Err(CommandError::OutOfBounds(target));
        }

        if let Some(index) = self.sentinels.iter().position(|s| s.pos == target) {
            let events = self.melee(index);
            return Ok(self.finish(events, true));
        }
        if self.map.is_wall(target) {
            return Err(CommandError::Blocked(target));
        }

        let mut events = Vec::new();
        if self.intruder.is_overheated() {
            self.intruder.take_damage(self.config.overheat_damage);
            self.intruder.heat = self.config.overheat_recovery_heat;
            events.push(TurnEvent::Overheated {
                damage: self.config.overheat_damage,
            });
        }

        let from = self.intruder.pos;
        self.intruder.pos = target;
        events.push(TurnEvent::Moved { from, to: target });

        if self.map.is_gateway(target) && self.intruder.is_alive() {
            events.extend(self.advance_level()?.events);
            return Ok(self.finish(events, false));
        }

        let process = if self.intruder.effects.is_active(StatusKind::SpeedBoost) {
            if self.intruder.speed_moves_remaining == 0 {
                self.intruder.speed_moves_remaining = 1;
                false
            } else {
                self.intruder.speed_moves_remaining -= 1;
                true
            }
        } else {
            true
        };
        Ok(self.finish(events, process))
    }

    fn melee(&mut self, index: usize) -> Vec<TurnEvent> {
        let mut events = Vec::new();
        let awareness = self.sentinels[index].awareness;
        let multiplier = match awareness {
            Awareness::Calm => self.config.stealth_attack_multiplier,
            Awareness::Suspicious => self.config.surprise_attack_multiplier,
            Awareness::Hostile => 1.0,
        };
        let damage = (self.config.melee_damage as f32 * multiplier) as i32;
        self.intruder.add_heat(self.config.melee_heat);

        let id = self.sentinels[index].id;
        events.push(TurnEvent::Attacked { target: id, damage });
        debug!(%id, damage, ?awareness, "melee attack");

        if self.sentinels[index].take_damage(damage) {
            let dead = self.sentinels.remove(index);
            let restore = if dead.is_boss() {
                self.config.boss_kill_restore
            } else {
                self.config.kill_restore
            };
            self.intruder.heal(restore);
            let surcharge = if awareness == Awareness::Calm {
                self.config.stealth_kill_surcharge
            } else {
                self.config.loud_kill_surcharge
            };
            self.detection.add(surcharge);
            events.push(TurnEvent::SentinelDestroyed {
                id,
                archetype: dead.archetype,
                surcharge,
            });
        } else {
            let pos = self.intruder.pos;
            self.sentinels[index].alert(pos);
            self.detection.add(self.config.failed_ambush_surcharge);
        }
        events
    }

    /// Let a turn pass
    pub fn wait(&mut self) -> CommandResult {
        self.ensure_running()?;
        Ok(self.finish(Vec::new(), true))
    }

    // === ABILITIES ===

    /// Fire an equipped ability, optionally at a target cell
    pub fn use_ability(&mut self, id: AbilityId, target: Option<Position>) -> CommandResult {
        self.ensure_running()?;
        if !self.intruder.loadout.contains(id) {
            return Err(CommandError::NotEquipped(id));
        }
        let cost = self.ability_heat_cost(id);
        if self.intruder.heat + cost > self.intruder.heat_limit {
            return Err(CommandError::Overheated {
                heat: self.intruder.heat,
                cost,
                limit: self.intruder.heat_limit,
            });
        }

        let def = id.def();
        let target = if id.needs_target() {
            target.ok_or(CommandError::MissingTarget)?
        } else {
            self.intruder.pos
        };
        if !self.map.in_bounds(target) {
            return Err(CommandError::OutOfBounds(target));
        }
        let distance = self.intruder.pos.distance(&target);
        if id.needs_target() && distance > def.range {
            return Err(CommandError::OutOfRange {
                distance,
                range: def.range,
            });
        }
        self.check_target(id, target)?;

        self.intruder.add_heat(cost);
        let mut events = vec![TurnEvent::AbilityUsed { ability: id, heat: cost }];
        self.apply_ability(id, target, &mut events);
        info!(ability = def.name, %target, heat = self.intruder.heat, "ability used");
        Ok(self.finish(events, true))
    }

    /// Target legality for abilities that care about the cell
    fn check_target(&self, id: AbilityId, target: Position) -> std::result::Result<(), CommandError> {
        match id {
            AbilityId::ShadowStep => {
                if !self.map.is_shadow(target) || !self.map.is_walkable(target) {
                    Err(CommandError::NotShadow(target))
                } else if self.sentinel_at(target).is_some() {
                    Err(CommandError::Occupied(target))
                } else {
                    Ok(())
                }
            }
            AbilityId::BufferOverflow | AbilityId::CodeInjection => {
                if self.sentinel_at(target).is_some() {
                    Ok(())
                } else {
                    Err(CommandError::NoTarget(target))
                }
            }
            _ => Ok(()),
        }
    }

    fn apply_ability(&mut self, id: AbilityId, target: Position, events: &mut Vec<TurnEvent>) {
        match id {
            AbilityId::ShadowStep => {
                let from = self.intruder.pos;
                self.intruder.pos = target;
                events.push(TurnEvent::Teleported { from, to: target });
            }
            AbilityId::DataMimic => {
                self.intruder
                    .effects
                    .grant(StatusKind::Invisibility, self.config.mimic_turns);
            }
            AbilityId::NoiseMaker => {
                let drawn = self.make_noise(target);
                events.push(TurnEvent::NoiseMade { at: target, drawn });
            }
            AbilityId::BufferOverflow => {
                self.strike(target, self.config.overflow_damage, events);
            }
            AbilityId::CodeInjection => {
                let firewall = self
                    .sentinel_at(target)
                    .is_some_and(|s| s.archetype == Archetype::Firewall);
                let damage = if firewall {
                    self.config.injection_firewall_damage
                } else {
                    self.config.injection_damage
                };
                self.strike(target, damage, events);
            }
            AbilityId::SystemCrash | AbilityId::EmpBurst => {
                let turns = if id == AbilityId::EmpBurst {
                    self.config.emp_disable_turns
                } else {
                    self.config.crash_disable_turns
                };
                let radius = id.def().range;
                let mut ids = Vec::new();
                for sentinel in &mut self.sentinels {
                    if sentinel.pos.distance(&target) <= radius {
                        sentinel.disable(turns);
                        ids.push(sentinel.id);
                    }
                }
                events.push(TurnEvent::SentinelsDisabled { ids, turns });
            }
            AbilityId::NetworkScan => {
                self.scan_turns = self.config.scan_turns;
                events.push(TurnEvent::ScanStarted {
                    turns: self.config.scan_turns,
                });
            }
            AbilityId::LogWiper => {
                let amount = self.detection.reduce(self.config.log_wiper_relief);
                events.push(TurnEvent::DetectionReduced { amount });
            }
        }
    }

    /// Draw mobile sentinels near `at` into investigating it
    fn make_noise(&mut self, at: Position) -> Vec<SentinelId> {
        let mut drawn = Vec::new();
        for sentinel in &mut self.sentinels {
            if sentinel.pos.distance(&at) > self.config.noise_radius {
                continue;
            }
            match sentinel.movement() {
                MovementStrategy::Patrol => {
                    sentinel.awareness = Awareness::Suspicious;
                    sentinel.state_timer = self.config.noise_patrol_turns;
                }
                MovementStrategy::Seek | MovementStrategy::Random => {
                    sentinel.awareness = Awareness::Suspicious;
                    sentinel.state_timer = self.config.noise_investigate_turns;
                    sentinel.last_known = Some(at);
                }
                MovementStrategy::Static | MovementStrategy::Track => continue,
            }
            drawn.push(sentinel.id);
        }
        drawn
    }

    /// Ability damage against the sentinel on `target`
    ///
    /// Ability kills restore integrity but add no detection surcharge.
    fn strike(&mut self, target: Position, damage: i32, events: &mut Vec<TurnEvent>) {
        let Some(index) = self.sentinels.iter().position(|s| s.pos == target) else {
            return;
        };
        let id = self.sentinels[index].id;
        events.push(TurnEvent::Attacked { target: id, damage });

        if self.sentinels[index].take_damage(damage) {
            let dead = self.sentinels.remove(index);
            self.intruder.heal(self.config.kill_restore);
            events.push(TurnEvent::SentinelDestroyed {
                id,
                archetype: dead.archetype,
                surcharge: 0,
            });
        } else {
            let pos = self.intruder.pos;
            self.sentinels[index].alert(pos);
        }
    }

    // === LEVELS ===

    /// Move on to the next level, or complete the run after the last one
    ///
    /// A free action: no turn is processed.
    pub fn advance_level(&mut self) -> CommandResult {
        self.ensure_running()?;
        let mut events = Vec::new();

        if self.level >= self.config.max_level {
            self.outcome = RunOutcome::Completed;
            info!(turn = self.turn, level = self.level, "run completed");
            events.push(TurnEvent::RunCompleted);
            return Ok(TurnReport {
                turn: self.turn,
                turn_processed: false,
                events,
            });
        }

        let next = self.level + 1;
        self.load_level(next);
        let relieved = self.detection.reduce(self.config.level_detection_relief);
        self.intruder.cool(self.config.level_heat_relief);
        events.push(TurnEvent::LevelAdvanced {
            level: next,
            name: self.params.name.clone(),
        });
        if relieved > 0 {
            events.push(TurnEvent::DetectionReduced { amount: relieved });
        }
        Ok(TurnReport {
            turn: self.turn,
            turn_processed: false,
            events,
        })
    }

    // === INVENTORY ===

    /// Use the inventory item in `slot`: a data patch or an ability cartridge
    pub fn use_item(&mut self, slot: usize) -> CommandResult {
        self.ensure_running()?;
        let item = *self
            .intruder
            .inventory
            .get(slot)
            .ok_or(CommandError::EmptySlot(slot))?;

        let mut events = Vec::new();
        match item {
            Pickup::Ability(id) => {
                self.intruder.loadout.equip(id)?;
                self.intruder.inventory.remove(slot);
                events.push(TurnEvent::AbilityEquipped(id));
            }
            Pickup::DataPatch(color) => {
                self.intruder.inventory.remove(slot);
                events.push(self.apply_patch(color));
            }
        }
        Ok(self.finish(events, true))
    }

    fn apply_patch(&mut self, color: PatchColor) -> TurnEvent {
        let discovered = self.patches.discover(color);
        let effect = self.patches.effect_of(color);
        match effect {
            PatchEffect::RestoreIntegrity => {
                let amount = PatchEffect::roll_restore(&mut self.rng);
                self.intruder.heal(amount);
            }
            PatchEffect::ReduceHeat => {
                self.intruder.cool(PatchEffect::HEAT_RELIEF);
            }
            PatchEffect::ReduceDetection => {
                self.detection.reduce(PatchEffect::DETECTION_RELIEF);
            }
            PatchEffect::SpeedBoost => {
                self.intruder
                    .effects
                    .grant(StatusKind::SpeedBoost, PatchEffect::SPEED_TURNS);
                self.intruder.speed_moves_remaining = 0;
            }
            PatchEffect::EnhancedVision => {
                self.intruder
                    .effects
                    .grant(StatusKind::EnhancedVision, PatchEffect::VISION_TURNS);
            }
            PatchEffect::AbilityEfficiency => {
                self.intruder
                    .effects
                    .grant(StatusKind::AbilityEfficiency, PatchEffect::EFFICIENCY_TURNS);
            }
        }
        info!(patch = effect.name(), ?color, discovered, "patch applied");
        TurnEvent::PatchUsed {
            color,
            effect,
            discovered,
        }
    }

    /// Remove an ability from the loadout, returning its cartridge to the inventory
    ///
    /// A free action.
    pub fn unequip_ability(&mut self, id: AbilityId) -> CommandResult {
        self.ensure_running()?;
        self.intruder.loadout.unequip(id)?;
        self.intruder.inventory.push(Pickup::Ability(id));
        Ok(TurnReport {
            turn: self.turn,
            turn_processed: false,
            events: vec![TurnEvent::AbilityUnequipped(id)],
        })
    }
}
