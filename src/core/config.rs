//! Run configuration with documented constants
//!
//! Every balance number the simulation uses is collected here with a note on
//! what it drives. Values can be overridden from TOML; missing keys keep their
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SignalError};

/// Configuration for one infiltration run
///
/// Passed explicitly into the run state. There is no global copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    // === INTRUDER ===
    /// Maximum (and starting) integrity
    pub max_integrity: i32,

    /// Heat ceiling. Abilities whose cost would push heat past this are refused.
    pub heat_limit: i32,

    /// Loadout capacity units available for equipped abilities
    pub loadout_capacity: u32,

    /// Maximum number of simultaneously equipped abilities
    pub loadout_slots: usize,

    /// Base intruder vision radius (used for the visible-sentinel query)
    pub intruder_vision: i32,

    /// Extra vision radius while enhanced vision is active
    pub enhanced_vision_bonus: i32,

    // === PER-TURN UPKEEP ===
    /// Heat shed every turn
    pub heat_decay: i32,

    /// Heat shed every turn while the efficiency effect is active
    pub heat_decay_efficient: i32,

    /// Heat removed by standing on a cooling node
    pub cooling_relief: i32,

    /// Integrity restored by standing on a restore node (capped at the deficit)
    pub restore_amount: i32,

    /// Integrity lost when moving while at the heat ceiling
    pub overheat_damage: i32,

    /// Heat level the intruder drops to after an overheat penalty
    pub overheat_recovery_heat: i32,

    // === SENTINEL AWARENESS ===
    /// Turns a sentinel stays Suspicious before turning Hostile (or Calm)
    pub suspicion_turns: i32,

    /// Per-turn chance a Hostile sentinel that cannot see the intruder gives up
    ///
    /// At 0.15 a lost pursuer lingers about 6-7 turns on average.
    pub lose_track_chance: f64,

    // === DETECTION / ESCALATION ===
    /// Detection level at which the boss sentinel is spawned (same every level)
    pub boss_threshold: i32,

    /// Minimum Chebyshev distance between the intruder and the boss spawn cell
    pub boss_min_distance: i32,

    /// Random candidate cells examined before falling back to the corner cell
    pub boss_spawn_attempts: u32,

    /// Passive detection added on each cadence tick
    pub passive_trickle: i32,

    /// Detection added when eliminating a sentinel that was still Calm
    pub stealth_kill_surcharge: i32,

    /// Detection added when eliminating an alerted sentinel
    pub loud_kill_surcharge: i32,

    /// Detection added when a melee attack fails to eliminate its target
    pub failed_ambush_surcharge: i32,

    /// Detection removed on reaching a new level
    pub level_detection_relief: i32,

    /// Heat removed on reaching a new level
    pub level_heat_relief: i32,

    // === COMBAT ===
    /// Base melee damage when bumping into a sentinel
    pub melee_damage: i32,

    /// Melee multiplier against Calm sentinels
    pub stealth_attack_multiplier: f32,

    /// Melee multiplier against Suspicious sentinels
    pub surprise_attack_multiplier: f32,

    /// Heat generated by a melee attack
    pub melee_heat: i32,

    /// Integrity recovered by eliminating a sentinel
    pub kill_restore: i32,

    /// Integrity recovered by eliminating the boss in melee
    pub boss_kill_restore: i32,

    // === ABILITY EFFECTS ===
    /// Heat cost multiplier while the efficiency effect is active
    pub efficiency_heat_multiplier: f32,

    /// Turns of invisibility granted by Data Mimic
    pub mimic_turns: u32,

    /// Turns the network scan stays active
    pub scan_turns: u32,

    /// Radius around a noise target that draws sentinels in
    pub noise_radius: i32,

    /// Suspicion countdown for patrols that hear a noise
    pub noise_patrol_turns: i32,

    /// Suspicion countdown for other sentinels sent to investigate a noise
    pub noise_investigate_turns: i32,

    /// Damage of a buffer overflow
    pub overflow_damage: i32,

    /// Damage of a code injection
    pub injection_damage: i32,

    /// Code injection damage against firewalls
    pub injection_firewall_damage: i32,

    /// Detection removed by the log wiper
    pub log_wiper_relief: i32,

    /// Turns sentinels stay disabled after a system crash
    pub crash_disable_turns: u32,

    /// Turns sentinels stay disabled after an EMP burst
    pub emp_disable_turns: u32,

    // === RUN ===
    /// Number of procedurally generated levels in a run
    pub max_level: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_integrity: 100,
            heat_limit: 100,
            loadout_capacity: 8,
            loadout_slots: 5,
            intruder_vision: 15,
            enhanced_vision_bonus: 5,

            heat_decay: 2,
            heat_decay_efficient: 3,
            cooling_relief: 20,
            restore_amount: 20,
            overheat_damage: 5,
            overheat_recovery_heat: 95,

            suspicion_turns: 3,
            lose_track_chance: 0.15,

            boss_threshold: 90,
            boss_min_distance: 15,
            boss_spawn_attempts: 50,
            passive_trickle: 1,
            stealth_kill_surcharge: 5,
            loud_kill_surcharge: 15,
            failed_ambush_surcharge: 20,
            level_detection_relief: 20,
            level_heat_relief: 30,

            melee_damage: 20,
            stealth_attack_multiplier: 2.0,
            surprise_attack_multiplier: 1.5,
            melee_heat: 15,
            kill_restore: 5,
            boss_kill_restore: 10,

            efficiency_heat_multiplier: 0.6,
            mimic_turns: 5,
            scan_turns: 15,
            noise_radius: 10,
            noise_patrol_turns: 3,
            noise_investigate_turns: 2,
            overflow_damage: 50,
            injection_damage: 30,
            injection_firewall_damage: 35,
            log_wiper_relief: 30,
            crash_disable_turns: 4,
            emp_disable_turns: 6,

            max_level: 3,
        }
    }
}

impl RunConfig {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_integrity <= 0 {
            return Err(SignalError::InvalidConfig(
                "max_integrity must be positive".into(),
            ));
        }

        if self.heat_limit <= 0 || self.overheat_recovery_heat > self.heat_limit {
            return Err(SignalError::InvalidConfig(format!(
                "overheat_recovery_heat ({}) must be within heat_limit ({})",
                self.overheat_recovery_heat, self.heat_limit
            )));
        }

        if !(1..=100).contains(&self.boss_threshold) {
            return Err(SignalError::InvalidConfig(format!(
                "boss_threshold ({}) must lie in 1..=100",
                self.boss_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.lose_track_chance) {
            return Err(SignalError::InvalidConfig(format!(
                "lose_track_chance ({}) must be a probability",
                self.lose_track_chance
            )));
        }

        if self.suspicion_turns < 1 {
            return Err(SignalError::InvalidConfig(
                "suspicion_turns must be at least 1".into(),
            ));
        }

        if self.max_level == 0 {
            return Err(SignalError::InvalidConfig("max_level must be at least 1".into()));
        }

        Ok(())
    }
}
