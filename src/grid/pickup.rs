//! Collectible items and the per-run data patch catalog
//!
//! Data patches are colour-coded. Which colour does what is shuffled once per
//! run and stays hidden until a patch of that colour is first used.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatchColor {
    Crimson,
    Azure,
    Emerald,
    Golden,
    Violet,
    Silver,
}

impl PatchColor {
    pub const ALL: [PatchColor; 6] = [
        PatchColor::Crimson,
        PatchColor::Azure,
        PatchColor::Emerald,
        PatchColor::Golden,
        PatchColor::Violet,
        PatchColor::Silver,
    ];

    fn index(self) -> usize {
        match self {
            PatchColor::Crimson => 0,
            PatchColor::Azure => 1,
            PatchColor::Emerald => 2,
            PatchColor::Golden => 3,
            PatchColor::Violet => 4,
            PatchColor::Silver => 5,
        }
    }
}

/// What a data patch does once used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatchEffect {
    /// Heals a random amount in 30..=40
    RestoreIntegrity,
    /// Removes 40 heat
    ReduceHeat,
    /// Removes 25 detection
    ReduceDetection,
    /// Two moves per turn for 10 turns
    SpeedBoost,
    /// Wider, wall-piercing sight for 15 turns
    EnhancedVision,
    /// Cheaper abilities and faster cooling for 8 turns
    AbilityEfficiency,
}

impl PatchEffect {
    pub const ALL: [PatchEffect; 6] = [
        PatchEffect::RestoreIntegrity,
        PatchEffect::ReduceHeat,
        PatchEffect::ReduceDetection,
        PatchEffect::SpeedBoost,
        PatchEffect::EnhancedVision,
        PatchEffect::AbilityEfficiency,
    ];

    pub const HEAT_RELIEF: i32 = 40;
    pub const DETECTION_RELIEF: i32 = 25;
    pub const SPEED_TURNS: u32 = 10;
    pub const VISION_TURNS: u32 = 15;
    pub const EFFICIENCY_TURNS: u32 = 8;

    pub fn name(&self) -> &'static str {
        match self {
            PatchEffect::RestoreIntegrity => "Integrity Restore",
            PatchEffect::ReduceHeat => "Heat Sink",
            PatchEffect::ReduceDetection => "Trace Scrubber",
            PatchEffect::SpeedBoost => "Overclock",
            PatchEffect::EnhancedVision => "Deep Scan",
            PatchEffect::AbilityEfficiency => "Optimizer",
        }
    }

    /// Integrity healed by a restore patch
    pub fn roll_restore(rng: &mut impl Rng) -> i32 {
        rng.gen_range(30..=40)
    }
}

/// Something lying on the grid waiting to be collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pickup {
    DataPatch(PatchColor),
    Ability(AbilityId),
}

/// Run-wide mapping from patch colour to effect, plus discovery flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchCatalog {
    effects: [PatchEffect; 6],
    discovered: [bool; 6],
}

impl PatchCatalog {
    /// Shuffle the colour to effect assignment
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut effects = PatchEffect::ALL;
        effects.shuffle(rng);
        Self {
            effects,
            discovered: [false; 6],
        }
    }

    pub fn effect_of(&self, color: PatchColor) -> PatchEffect {
        self.effects[color.index()]
    }

    pub fn is_discovered(&self, color: PatchColor) -> bool {
        self.discovered[color.index()]
    }

    /// Flip the discovery flag; returns true the first time
    pub fn discover(&mut self, color: PatchColor) -> bool {
        let slot = &mut self.discovered[color.index()];
        let first = !*slot;
        *slot = true;
        first
    }

    /// The effect if the colour has been identified
    pub fn known_effect(&self, color: PatchColor) -> Option<PatchEffect> {
        self.is_discovered(color).then(|| self.effect_of(color))
    }
}
