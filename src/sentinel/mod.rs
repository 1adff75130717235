//! Sentinels: the network's defensive agents
//!
//! Each turn runs in phases across all sentinels: awareness first, then
//! movement, then contact damage. See `simulation::turn`.

pub mod archetype;
pub mod awareness;
pub mod movement;

use serde::{Deserialize, Serialize};

use crate::core::types::{Position, SentinelId};

pub use archetype::{Archetype, ArchetypeProfile, DecayTarget, MovementStrategy};
pub use awareness::{sentinel_observes, update_awareness, Awareness, AwarenessUpdate};
pub use movement::{step_toward, update_movement, Blockers, MovementResult};

/// Ordered waypoint loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrolRoute {
    pub waypoints: Vec<Position>,
    pub index: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Position>) -> Self {
        Self {
            waypoints,
            index: 0,
        }
    }

    /// Current target; an empty route has none and reports the origin
    pub fn current(&self) -> Position {
        self.waypoints
            .get(self.index)
            .copied()
            .unwrap_or_default()
    }

    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.index = (self.index + 1) % self.waypoints.len();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentinel {
    pub id: SentinelId,
    pub archetype: Archetype,
    pub pos: Position,
    pub integrity: i32,
    pub awareness: Awareness,
    /// Countdown for the Suspicious state
    pub state_timer: i32,
    pub patrol: Option<PatrolRoute>,
    pub last_known: Option<Position>,
    pub disabled_turns: u32,
    pub move_cooldown: u32,
}

impl Sentinel {
    pub fn new(id: SentinelId, archetype: Archetype, pos: Position) -> Self {
        Self {
            id,
            archetype,
            pos,
            integrity: archetype.profile().integrity,
            awareness: Awareness::Calm,
            state_timer: 0,
            patrol: None,
            last_known: None,
            disabled_turns: 0,
            move_cooldown: 0,
        }
    }

    pub fn with_patrol(mut self, waypoints: Vec<Position>) -> Self {
        self.patrol = Some(PatrolRoute::new(waypoints));
        self
    }

    pub fn profile(&self) -> &'static ArchetypeProfile {
        self.archetype.profile()
    }

    pub fn vision(&self) -> i32 {
        self.profile().vision
    }

    /// Patrol archetypes without a route stand still
    pub fn movement(&self) -> MovementStrategy {
        match self.profile().movement {
            MovementStrategy::Patrol if self.patrol.is_none() => MovementStrategy::Static,
            strategy => strategy,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled_turns > 0
    }

    pub fn is_boss(&self) -> bool {
        self.archetype.is_boss()
    }

    /// Apply damage; returns true if the sentinel is destroyed
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.integrity -= amount;
        self.integrity <= 0
    }

    /// Knock the sentinel out and wipe its alertness
    pub fn disable(&mut self, turns: u32) {
        self.disabled_turns = self.disabled_turns.max(turns);
        self.awareness = Awareness::Calm;
        self.state_timer = 0;
    }

    /// Force Hostile with a fresh sighting
    pub fn alert(&mut self, seen_at: Position) {
        self.awareness = Awareness::Hostile;
        self.state_timer = 0;
        self.last_known = Some(seen_at);
    }
}
