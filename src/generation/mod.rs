//! Procedural level generation
//!
//! Pipeline: rooms, corridors, connectivity repair, shadow and cover
//! decoration, a second connectivity pass, a shadow top-up, then gateway,
//! nodes, pickups and sentinels. The same seed and parameters always
//! produce the same level.

pub mod connectivity;
pub mod corridors;
pub mod decoration;
pub mod params;
pub mod placement;
pub mod rooms;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::types::Position;
use crate::grid::map::GridMap;
use crate::sentinel::Sentinel;

pub use params::LevelParams;
pub use rooms::Room;

/// A freshly generated level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub map: GridMap,
    pub sentinels: Vec<Sentinel>,
    pub rooms: Vec<Room>,
    pub spawn: Position,
    pub gateway: Option<Position>,
}

/// Build a level from parameters and a seed
pub fn generate_level(params: &LevelParams, seed: u64) -> GeneratedLevel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut map = GridMap::filled(params.width, params.height);
    let spawn = params.spawn;

    let rooms = rooms::place_rooms(&mut map, params, &mut rng);
    corridors::connect_rooms(&mut map, &rooms, &mut rng);
    corridors::add_loops(&mut map, &rooms, &mut rng);
    connectivity::ensure_connected(&mut map, spawn, &mut rng);

    decoration::scatter_shadows(&mut map, params.shadow_coverage, &mut rng);
    decoration::add_cover(&mut map, &rooms[0], &mut rng);
    connectivity::ensure_connected(&mut map, spawn, &mut rng);
    decoration::scatter_shadows(&mut map, params.shadow_coverage, &mut rng);

    let gateway = placement::place_gateway(&mut map, &rooms, spawn);
    let mut occupancy = placement::Occupancy::with_spawn(spawn);
    placement::place_nodes(&mut map, params.node_count, spawn, &occupancy, &mut rng);
    placement::place_pickups(
        &mut map,
        params.patch_count,
        params.cartridge_count,
        spawn,
        &occupancy,
        &mut rng,
    );
    let sentinels = placement::place_sentinels(
        &map,
        params.sentinel_count,
        spawn,
        &mut occupancy,
        1,
        &mut rng,
    );

    info!(
        level = params.level,
        name = %params.name,
        seed,
        rooms = rooms.len(),
        floor = map.floor_count(),
        shadows = map.shadow_count(),
        sentinels = sentinels.len(),
        "generated level"
    );

    GeneratedLevel {
        map,
        sentinels,
        rooms,
        spawn,
        gateway,
    }
}
