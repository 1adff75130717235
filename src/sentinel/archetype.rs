//! Sentinel archetypes and their fixed profiles

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a sentinel moves on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementStrategy {
    /// Never moves
    Static,
    /// One random legal cardinal step
    Random,
    /// Walks a waypoint loop
    Patrol,
    /// Heads for the last known intruder position while Hostile
    Seek,
    /// Follows the live intruder position while Hostile
    Track,
}

/// Where a Hostile sentinel falls back to once it loses the intruder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecayTarget {
    Calm,
    /// Stay alert with a fresh countdown
    Suspicious { turns: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    Scanner,
    Patrol,
    Bot,
    Firewall,
    Hunter,
    /// Boss pursuer spawned by escalation, never by level generation
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchetypeProfile {
    pub name: &'static str,
    pub symbol: char,
    pub integrity: i32,
    pub vision: i32,
    pub movement: MovementStrategy,
    /// Damage dealt to an adjacent intruder each turn
    pub contact_damage: i32,
    /// One-time detection added on turning Hostile
    pub hostile_spike: i32,
    /// Detection added each turn while Hostile and observing
    pub hostile_trickle: i32,
    pub decay: DecayTarget,
    /// Relative frequency during level population (0 = never generated)
    pub spawn_weight: u32,
}

const SCANNER: ArchetypeProfile = ArchetypeProfile {
    name: "Scanner",
    symbol: 's',
    integrity: 20,
    vision: 2,
    movement: MovementStrategy::Static,
    contact_damage: 3,
    hostile_spike: 10,
    hostile_trickle: 1,
    decay: DecayTarget::Calm,
    spawn_weight: 3,
};

const PATROL: ArchetypeProfile = ArchetypeProfile {
    name: "Patrol",
    symbol: 'p',
    integrity: 25,
    vision: 3,
    movement: MovementStrategy::Patrol,
    contact_damage: 5,
    hostile_spike: 10,
    hostile_trickle: 1,
    decay: DecayTarget::Calm,
    spawn_weight: 2,
};

const BOT: ArchetypeProfile = ArchetypeProfile {
    name: "Bot",
    symbol: 'b',
    integrity: 15,
    vision: 2,
    movement: MovementStrategy::Random,
    contact_damage: 4,
    hostile_spike: 10,
    hostile_trickle: 1,
    decay: DecayTarget::Calm,
    spawn_weight: 3,
};

const FIREWALL: ArchetypeProfile = ArchetypeProfile {
    name: "Firewall",
    symbol: 'F',
    integrity: 40,
    vision: 1,
    movement: MovementStrategy::Static,
    contact_damage: 8,
    hostile_spike: 10,
    hostile_trickle: 1,
    decay: DecayTarget::Calm,
    spawn_weight: 1,
};

const HUNTER: ArchetypeProfile = ArchetypeProfile {
    name: "Hunter",
    symbol: 'H',
    integrity: 35,
    vision: 5,
    movement: MovementStrategy::Seek,
    contact_damage: 10,
    hostile_spike: 10,
    hostile_trickle: 1,
    decay: DecayTarget::Calm,
    spawn_weight: 1,
};

const ADMIN: ArchetypeProfile = ArchetypeProfile {
    name: "Admin Avatar",
    symbol: 'A',
    integrity: 100,
    vision: 6,
    movement: MovementStrategy::Track,
    contact_damage: 20,
    hostile_spike: 15,
    hostile_trickle: 3,
    decay: DecayTarget::Suspicious { turns: 5 },
    spawn_weight: 0,
};

impl Archetype {
    /// Archetypes that level generation draws from
    pub const GENERATED: [Archetype; 5] = [
        Archetype::Scanner,
        Archetype::Patrol,
        Archetype::Bot,
        Archetype::Firewall,
        Archetype::Hunter,
    ];

    pub fn profile(&self) -> &'static ArchetypeProfile {
        match self {
            Archetype::Scanner => &SCANNER,
            Archetype::Patrol => &PATROL,
            Archetype::Bot => &BOT,
            Archetype::Firewall => &FIREWALL,
            Archetype::Hunter => &HUNTER,
            Archetype::Admin => &ADMIN,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Archetype::Admin)
    }

    /// Weighted draw over the generated archetypes
    pub fn roll(rng: &mut impl Rng) -> Archetype {
        let total: u32 = Self::GENERATED.iter().map(|a| a.profile().spawn_weight).sum();
        let mut pick = rng.gen_range(0..total);
        for archetype in Self::GENERATED {
            let weight = archetype.profile().spawn_weight;
            if pick < weight {
                return archetype;
            }
            pick -= weight;
        }
        Archetype::Scanner
    }
}
