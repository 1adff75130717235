//! Ability definitions and catalog

use serde::{Deserialize, Serialize};

/// Unique ability identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityId {
    ShadowStep,
    DataMimic,
    NoiseMaker,
    BufferOverflow,
    CodeInjection,
    SystemCrash,
    NetworkScan,
    LogWiper,
    EmpBurst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityCategory {
    Stealth,
    Combat,
    Utility,
    Emergency,
}

/// How an ability picks its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Targeting {
    /// Acts on the intruder itself
    None,
    /// Acts on one cell
    Single,
    /// Acts on every sentinel within `range` of the target cell
    Area,
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityDef {
    pub name: &'static str,
    pub loadout_cost: u32,
    pub heat_cost: i32,
    pub range: i32,
    pub targeting: Targeting,
    pub category: AbilityCategory,
    pub description: &'static str,
}

const SHADOW_STEP: AbilityDef = AbilityDef {
    name: "Shadow Step",
    loadout_cost: 2,
    heat_cost: 20,
    range: 8,
    targeting: Targeting::Single,
    category: AbilityCategory::Stealth,
    description: "Teleport between shadow zones",
};

const DATA_MIMIC: AbilityDef = AbilityDef {
    name: "Data Mimic",
    loadout_cost: 1,
    heat_cost: 15,
    range: 0,
    targeting: Targeting::None,
    category: AbilityCategory::Stealth,
    description: "Appear as harmless data for a few turns",
};

const NOISE_MAKER: AbilityDef = AbilityDef {
    name: "Noise Maker",
    loadout_cost: 1,
    heat_cost: 10,
    range: 6,
    targeting: Targeting::Single,
    category: AbilityCategory::Stealth,
    description: "Create a distraction at the target location",
};

const BUFFER_OVERFLOW: AbilityDef = AbilityDef {
    name: "Buffer Overflow",
    loadout_cost: 2,
    heat_cost: 25,
    range: 1,
    targeting: Targeting::Single,
    category: AbilityCategory::Combat,
    description: "High melee damage against an adjacent sentinel",
};

const CODE_INJECTION: AbilityDef = AbilityDef {
    name: "Code Injection",
    loadout_cost: 1,
    heat_cost: 15,
    range: 4,
    targeting: Targeting::Single,
    category: AbilityCategory::Combat,
    description: "Ranged attack, bypasses firewalls",
};

const SYSTEM_CRASH: AbilityDef = AbilityDef {
    name: "System Crash",
    loadout_cost: 3,
    heat_cost: 35,
    range: 3,
    targeting: Targeting::Area,
    category: AbilityCategory::Combat,
    description: "Disables every sentinel around the target",
};

const NETWORK_SCAN: AbilityDef = AbilityDef {
    name: "Network Scan",
    loadout_cost: 1,
    heat_cost: 10,
    range: 8,
    targeting: Targeting::None,
    category: AbilityCategory::Utility,
    description: "Reveals sentinel positions and patrol routes",
};

const LOG_WIPER: AbilityDef = AbilityDef {
    name: "Log Wiper",
    loadout_cost: 1,
    heat_cost: 5,
    range: 0,
    targeting: Targeting::None,
    category: AbilityCategory::Utility,
    description: "Reduces detection significantly",
};

const EMP_BURST: AbilityDef = AbilityDef {
    name: "EMP Burst",
    loadout_cost: 3,
    heat_cost: 40,
    range: 2,
    targeting: Targeting::Area,
    category: AbilityCategory::Emergency,
    description: "Disables all nearby sentinels for longer",
};

impl AbilityId {
    pub const ALL: [AbilityId; 9] = [
        AbilityId::ShadowStep,
        AbilityId::DataMimic,
        AbilityId::NoiseMaker,
        AbilityId::BufferOverflow,
        AbilityId::CodeInjection,
        AbilityId::SystemCrash,
        AbilityId::NetworkScan,
        AbilityId::LogWiper,
        AbilityId::EmpBurst,
    ];

    pub fn def(&self) -> &'static AbilityDef {
        match self {
            AbilityId::ShadowStep => &SHADOW_STEP,
            AbilityId::DataMimic => &DATA_MIMIC,
            AbilityId::NoiseMaker => &NOISE_MAKER,
            AbilityId::BufferOverflow => &BUFFER_OVERFLOW,
            AbilityId::CodeInjection => &CODE_INJECTION,
            AbilityId::SystemCrash => &SYSTEM_CRASH,
            AbilityId::NetworkScan => &NETWORK_SCAN,
            AbilityId::LogWiper => &LOG_WIPER,
            AbilityId::EmpBurst => &EMP_BURST,
        }
    }

    pub fn category(&self) -> AbilityCategory {
        self.def().category
    }

    /// Abilities that need a target cell from the caller
    pub fn needs_target(&self) -> bool {
        !matches!(self.def().targeting, Targeting::None)
    }

    /// Loadout a fresh intruder starts with
    pub fn starting_loadout() -> Vec<AbilityId> {
        vec![
            AbilityId::ShadowStep,
            AbilityId::NetworkScan,
            AbilityId::CodeInjection,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_ability_has_a_definition() {
        for id in AbilityId::ALL {
            let def = id.def();
            assert!(!def.name.is_empty());
            assert!(!def.description.is_empty());
            assert!(def.loadout_cost >= 1);
            assert!(def.heat_cost > 0);
        }
    }

    #[test]
    fn test_targeted_abilities_have_range() {
        for id in AbilityId::ALL {
            if id.needs_target() {
                assert!(id.def().range > 0, "{:?} needs a range", id);
            }
        }
    }

    #[test]
    fn test_starting_loadout_fits_default_capacity() {
        let cost: u32 = AbilityId::starting_loadout()
            .iter()
            .map(|id| id.def().loadout_cost)
            .sum();
        assert!(cost <= 8);
    }

    #[test]
    fn test_categories() {
        assert_eq!(AbilityId::ShadowStep.category(), AbilityCategory::Stealth);
        assert_eq!(AbilityId::SystemCrash.category(), AbilityCategory::Combat);
        assert_eq!(AbilityId::EmpBurst.category(), AbilityCategory::Emergency);
    }
}
