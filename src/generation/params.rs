//! Per-level generation presets

use serde::{Deserialize, Serialize};

use crate::core::types::Position;

/// Default grid size
pub const MAP_WIDTH: i32 = 50;
pub const MAP_HEIGHT: i32 = 50;

/// Where the intruder enters every level
pub const DEFAULT_SPAWN: Position = Position::new(5, 5);

/// Inputs for building one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub level: u32,
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub spawn: Position,

    // === ROOMS ===
    pub min_rooms: u32,
    pub max_rooms: u32,
    /// Random room draws before giving up on the room target
    pub room_attempts: u32,
    /// Draws for the small-room filling pass
    pub fill_attempts: u32,

    // === DECORATION ===
    /// Fraction of floor cells to cover in shadow
    pub shadow_coverage: f32,

    // === POPULATION ===
    pub sentinel_count: u32,
    pub node_count: u32,
    pub patch_count: u32,
    pub cartridge_count: u32,

    // === ESCALATION ===
    /// Passive detection ticks every this many turns (smaller = harder)
    pub passive_cadence: u32,
}

impl LevelParams {
    /// Preset for levels 1-3; higher levels reuse the level 3 preset
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let (name, min_rooms, max_rooms, shadow_coverage, sentinel_count, cartridges, cadence) =
            match level {
                1 => ("Corporate Network", 12, 16, 0.4, 8, 1, 20),
                2 => ("Government System", 14, 18, 0.25, 12, 2, 15),
                _ => ("Military Backbone", 16, 20, 0.15, 16, 2, 10),
            };

        Self {
            level,
            name: name.to_string(),
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            spawn: DEFAULT_SPAWN,
            min_rooms,
            max_rooms,
            room_attempts: 300,
            fill_attempts: 50,
            shadow_coverage,
            sentinel_count,
            node_count: 4 + level.min(3),
            patch_count: 6 + 2 * level.min(3),
            cartridge_count: cartridges,
            passive_cadence: cadence,
        }
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}
