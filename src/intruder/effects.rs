//! Timed status effects on the intruder

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Invisibility,
    SpeedBoost,
    EnhancedVision,
    AbilityEfficiency,
}

/// Remaining turns for each timed effect; zero means inactive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub invisibility: u32,
    pub speed_boost: u32,
    pub enhanced_vision: u32,
    pub ability_efficiency: u32,
}

impl StatusEffects {
    pub fn remaining(&self, kind: StatusKind) -> u32 {
        match kind {
            StatusKind::Invisibility => self.invisibility,
            StatusKind::SpeedBoost => self.speed_boost,
            StatusKind::EnhancedVision => self.enhanced_vision,
            StatusKind::AbilityEfficiency => self.ability_efficiency,
        }
    }

    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.remaining(kind) > 0
    }

    /// Start an effect, keeping the longer of the old and new durations
    pub fn grant(&mut self, kind: StatusKind, turns: u32) {
        let slot = self.slot_mut(kind);
        *slot = (*slot).max(turns);
    }

    /// Tick every counter down by one (floor 0), returning effects that just ended
    pub fn decay(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for kind in [
            StatusKind::Invisibility,
            StatusKind::SpeedBoost,
            StatusKind::EnhancedVision,
            StatusKind::AbilityEfficiency,
        ] {
            let slot = self.slot_mut(kind);
            if *slot > 0 {
                *slot -= 1;
                if *slot == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }

    fn slot_mut(&mut self, kind: StatusKind) -> &mut u32 {
        match kind {
            StatusKind::Invisibility => &mut self.invisibility,
            StatusKind::SpeedBoost => &mut self.speed_boost,
            StatusKind::EnhancedVision => &mut self.enhanced_vision,
            StatusKind::AbilityEfficiency => &mut self.ability_efficiency,
        }
    }
}
