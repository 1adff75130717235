//! Awareness state machine
//!
//! Calm -> Suspicious on first sighting. Suspicious counts down; if the
//! intruder is still in view when it expires the sentinel turns Hostile,
//! otherwise it calms down. Hostile sentinels that lose the intruder give up
//! with a fixed per-turn chance and fall back to their archetype's decay
//! target.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::RunConfig;
use crate::core::types::Position;
use crate::grid::map::GridMap;
use crate::intruder::Intruder;
use crate::sentinel::archetype::DecayTarget;
use crate::sentinel::Sentinel;
use crate::visibility::observe::can_observe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Awareness {
    #[default]
    Calm,
    Suspicious,
    Hostile,
}

/// Result of one awareness update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwarenessUpdate {
    pub observed: bool,
    /// (before, after) when the state changed
    pub transition: Option<(Awareness, Awareness)>,
    /// Detection to add to the global scalar
    pub detection: i32,
}

/// Does this sentinel see the intruder right now?
pub fn sentinel_observes(sentinel: &Sentinel, intruder: &Intruder, map: &GridMap) -> bool {
    if sentinel.is_disabled() {
        return false;
    }
    can_observe(
        sentinel.pos,
        sentinel.vision(),
        intruder.pos,
        map.is_shadow(intruder.pos),
        intruder.is_invisible(),
        map,
    )
}

/// Advance one sentinel's awareness for this turn
pub fn update_awareness(
    sentinel: &mut Sentinel,
    observed: bool,
    intruder_pos: Position,
    config: &RunConfig,
    rng: &mut impl Rng,
) -> AwarenessUpdate {
    let mut result = AwarenessUpdate {
        observed,
        ..AwarenessUpdate::default()
    };
    let before = sentinel.awareness;
    let profile = sentinel.archetype.profile();

    match (before, observed) {
        (Awareness::Calm, true) => {
            sentinel.awareness = Awareness::Suspicious;
            sentinel.state_timer = config.suspicion_turns;
        }
        (Awareness::Calm, false) => {}
        (Awareness::Suspicious, true) => {
            sentinel.state_timer -= 1;
            if sentinel.state_timer <= 0 {
                sentinel.awareness = Awareness::Hostile;
                sentinel.state_timer = 0;
                sentinel.last_known = Some(intruder_pos);
                result.detection += profile.hostile_spike;
            }
        }
        (Awareness::Suspicious, false) => {
            sentinel.state_timer -= 1;
            if sentinel.state_timer <= 0 {
                sentinel.awareness = Awareness::Calm;
                sentinel.state_timer = 0;
            }
        }
        (Awareness::Hostile, true) => {
            sentinel.last_known = Some(intruder_pos);
            result.detection += profile.hostile_trickle;
        }
        (Awareness::Hostile, false) => {
            if rng.gen_bool(config.lose_track_chance) {
                match profile.decay {
                    DecayTarget::Calm => {
                        sentinel.awareness = Awareness::Calm;
                        sentinel.state_timer = 0;
                        sentinel.last_known = None;
                    }
                    DecayTarget::Suspicious { turns } => {
                        sentinel.awareness = Awareness::Suspicious;
                        sentinel.state_timer = turns;
                    }
                }
            }
        }
    }

    if sentinel.awareness != before {
        result.transition = Some((before, sentinel.awareness));
    }
    result
}
