//! The intruder: position, resources, timed effects, loadout and inventory

pub mod effects;
pub mod loadout;

use serde::{Deserialize, Serialize};

use crate::core::config::RunConfig;
use crate::core::types::Position;
use crate::grid::pickup::Pickup;

pub use effects::{StatusEffects, StatusKind};
pub use loadout::Loadout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intruder {
    pub pos: Position,
    pub integrity: i32,
    pub max_integrity: i32,
    pub heat: i32,
    pub heat_limit: i32,
    pub effects: StatusEffects,
    pub loadout: Loadout,
    pub inventory: Vec<Pickup>,
    /// Free moves banked under speed boost before the next turn is processed
    pub speed_moves_remaining: u32,
}

impl Intruder {
    pub fn new(pos: Position, config: &RunConfig) -> Self {
        Self {
            pos,
            integrity: config.max_integrity,
            max_integrity: config.max_integrity,
            heat: 0,
            heat_limit: config.heat_limit,
            effects: StatusEffects::default(),
            loadout: Loadout::starting(config.loadout_capacity, config.loadout_slots),
            inventory: Vec::new(),
            speed_moves_remaining: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.integrity > 0
    }

    pub fn is_invisible(&self) -> bool {
        self.effects.is_active(StatusKind::Invisibility)
    }

    pub fn has_enhanced_vision(&self) -> bool {
        self.effects.is_active(StatusKind::EnhancedVision)
    }

    pub fn is_efficient(&self) -> bool {
        self.effects.is_active(StatusKind::AbilityEfficiency)
    }

    pub fn is_overheated(&self) -> bool {
        self.heat >= self.heat_limit
    }

    /// Apply damage; integrity floors at zero
    pub fn take_damage(&mut self, amount: i32) {
        self.integrity = (self.integrity - amount.max(0)).max(0);
    }

    /// Heal up to the deficit, returning the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let restored = amount.max(0).min(self.max_integrity - self.integrity);
        self.integrity += restored;
        restored
    }

    pub fn add_heat(&mut self, amount: i32) {
        self.heat = (self.heat + amount).clamp(0, self.heat_limit);
    }

    /// Cool down, returning the heat actually shed
    pub fn cool(&mut self, amount: i32) -> i32 {
        let shed = amount.max(0).min(self.heat);
        self.heat -= shed;
        shed
    }
}
