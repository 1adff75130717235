//! Owned state of one infiltration run and its query surface

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::RunConfig;
use crate::core::error::Result;
use crate::core::types::{Position, SentinelId, Turn};
use crate::escalation::DetectionMeter;
use crate::generation::{generate_level, LevelParams, Room};
use crate::grid::map::{GridMap, TileKind};
use crate::grid::pickup::{PatchCatalog, PatchColor, PatchEffect};
use crate::intruder::Intruder;
use crate::sentinel::{Awareness, Sentinel};
use crate::visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunOutcome {
    #[default]
    InProgress,
    /// Every level breached
    Completed,
    /// Integrity reached zero
    Failed,
}

/// Seed for level `level` of a run seeded with `seed`
pub fn level_seed(seed: u64, level: u32) -> u64 {
    seed ^ (level as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Everything one run owns
///
/// Passed explicitly to every command and turn. Callers serialize access:
/// one command, then its turn, never interleaved.
#[derive(Debug, Clone)]
pub struct RunState {
    pub config: RunConfig,
    pub seed: u64,
    pub level: u32,
    pub params: LevelParams,
    pub turn: Turn,
    pub map: GridMap,
    pub rooms: Vec<Room>,
    pub spawn: Position,
    pub intruder: Intruder,
    pub sentinels: Vec<Sentinel>,
    pub detection: DetectionMeter,
    /// Set once the boss has appeared on the current level
    pub boss_spawned: bool,
    /// Remaining turns of the network scan
    pub scan_turns: u32,
    pub patches: PatchCatalog,
    pub outcome: RunOutcome,
    pub(crate) next_sentinel_id: u32,
    pub(crate) rng: ChaCha8Rng,
}

impl RunState {
    /// Start a run at level 1
    pub fn new(config: RunConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let patches = PatchCatalog::shuffled(&mut rng);
        let params = LevelParams::for_level(1);
        let intruder = Intruder::new(params.spawn, &config);

        let mut run = Self {
            config,
            seed,
            level: 1,
            spawn: params.spawn,
            params,
            turn: 0,
            map: GridMap::new(1, 1),
            rooms: Vec::new(),
            intruder,
            sentinels: Vec::new(),
            detection: DetectionMeter::default(),
            boss_spawned: false,
            scan_turns: 0,
            patches,
            outcome: RunOutcome::InProgress,
            next_sentinel_id: 1,
            rng,
        };
        run.load_level(1);
        Ok(run)
    }

    /// A run on a hand-built map, for scenarios and tests
    pub fn with_map(
        config: RunConfig,
        map: GridMap,
        spawn: Position,
        sentinels: Vec<Sentinel>,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let patches = PatchCatalog::shuffled(&mut rng);
        let next_sentinel_id = sentinels.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
        let mut params = LevelParams::for_level(1).with_size(map.width, map.height);
        params.spawn = spawn;
        let intruder = Intruder::new(spawn, &config);

        Self {
            config,
            seed,
            level: 1,
            params,
            turn: 0,
            map,
            rooms: Vec::new(),
            spawn,
            intruder,
            sentinels,
            detection: DetectionMeter::default(),
            boss_spawned: false,
            scan_turns: 0,
            patches,
            outcome: RunOutcome::InProgress,
            next_sentinel_id,
            rng,
        }
    }

    /// Replace the current level with a freshly generated one
    ///
    /// Clears per-level state; intruder resources carry over.
    pub(crate) fn load_level(&mut self, level: u32) {
        let params = LevelParams::for_level(level);
        let generated = generate_level(&params, level_seed(self.seed, level));

        self.level = level;
        self.map = generated.map;
        self.rooms = generated.rooms;
        self.spawn = generated.spawn;
        self.next_sentinel_id = generated.sentinels.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
        self.sentinels = generated.sentinels;
        self.intruder.pos = generated.spawn;
        self.intruder.speed_moves_remaining = 0;
        self.boss_spawned = false;
        self.scan_turns = 0;

        info!(level, name = %params.name, sentinels = self.sentinels.len(), "entered level");
        self.params = params;
    }

    pub(crate) fn allocate_sentinel_id(&mut self) -> SentinelId {
        let id = SentinelId::new(self.next_sentinel_id);
        self.next_sentinel_id += 1;
        id
    }

    // === QUERIES ===

    pub fn is_over(&self) -> bool {
        self.outcome != RunOutcome::InProgress
    }

    pub fn detection_level(&self) -> i32 {
        self.detection.level()
    }

    pub fn level_name(&self) -> &str {
        &self.params.name
    }

    pub fn gateway(&self) -> Option<Position> {
        self.map.gateway()
    }

    pub fn tile_at(&self, pos: Position) -> TileKind {
        self.map.tile_at(pos)
    }

    pub fn scan_active(&self) -> bool {
        self.scan_turns > 0
    }

    pub fn sentinel(&self, id: SentinelId) -> Option<&Sentinel> {
        self.sentinels.iter().find(|s| s.id == id)
    }

    pub fn sentinel_at(&self, pos: Position) -> Option<&Sentinel> {
        self.sentinels.iter().find(|s| s.pos == pos)
    }

    pub fn boss(&self) -> Option<&Sentinel> {
        self.sentinels.iter().find(|s| s.is_boss())
    }

    pub fn hostile_count(&self) -> usize {
        self.sentinels
            .iter()
            .filter(|s| s.awareness == Awareness::Hostile)
            .count()
    }

    /// Sentinels the intruder currently sees
    pub fn visible_sentinels(&self) -> Vec<SentinelId> {
        visibility::visible_sentinels(
            &self.intruder,
            &self.sentinels,
            &self.map,
            &self.config,
            self.scan_active(),
        )
    }

    /// Cells the given sentinel is watching
    pub fn vision_overlay(&self, id: SentinelId) -> Option<Vec<Position>> {
        self.sentinel(id)
            .map(|s| visibility::vision_overlay(s, &self.map))
    }

    /// Effect of a patch colour, if identified
    pub fn patch_knowledge(&self, color: PatchColor) -> Option<PatchEffect> {
        self.patches.known_effect(color)
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            level: self.level,
            level_name: self.params.name.clone(),
            turn: self.turn,
            outcome: self.outcome,
            intruder_pos: self.intruder.pos,
            integrity: self.intruder.integrity,
            heat: self.intruder.heat,
            detection: self.detection.level(),
            sentinels: self.sentinels.len(),
            hostile: self.hostile_count(),
            boss_spawned: self.boss_spawned,
            gateway: self.gateway(),
            inventory: self.intruder.inventory.len(),
        }
    }
}

/// Serializable summary of a run for outer layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub level: u32,
    pub level_name: String,
    pub turn: Turn,
    pub outcome: RunOutcome,
    pub intruder_pos: Position,
    pub integrity: i32,
    pub heat: i32,
    pub detection: i32,
    pub sentinels: usize,
    pub hostile: usize,
    pub boss_spawned: bool,
    pub gateway: Option<Position>,
    pub inventory: usize,
}
