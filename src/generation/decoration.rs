//! Shadow clusters and wall cover

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::core::types::Position;
use crate::generation::rooms::Room;
use crate::grid::map::GridMap;

/// Cells a single shadow cluster tries to cover
const CLUSTER_MIN: u32 = 8;
const CLUSTER_MAX: u32 = 20;
const CLUSTER_JITTER: i32 = 3;
/// Cluster budget per minimum-size cluster the target needs
const CLUSTER_SAFETY_FACTOR: usize = 8;

/// Stride of the cover sampling grid
const COVER_STRIDE: usize = 5;
/// A 5x5 window needs more open cells than this to get cover
const COVER_OPENNESS: usize = 20;
const COVER_CHANCE: f32 = 0.3;

/// Scatter jittered shadow clusters until `coverage` of the floor is shaded
///
/// The cluster budget scales with the target so it only stops a map whose
/// floor cannot hold the target. Calling again tops coverage back up after
/// later passes wall over shaded cells. Returns the number of shadow cells.
pub fn scatter_shadows(map: &mut GridMap, coverage: f32, rng: &mut ChaCha8Rng) -> usize {
    let floor = map.floor_cells();
    if floor.is_empty() {
        return 0;
    }
    let target = (floor.len() as f32 * coverage.clamp(0.0, 1.0)) as usize;
    let budget = (target / CLUSTER_MIN as usize + 1) * CLUSTER_SAFETY_FACTOR;

    for _ in 0..budget {
        if map.shadow_count() >= target {
            break;
        }
        let center = floor[rng.gen_range(0..floor.len())];
        let size = rng.gen_range(CLUSTER_MIN..=CLUSTER_MAX);
        for _ in 0..size {
            let pos = center.offset(
                rng.gen_range(-CLUSTER_JITTER..=CLUSTER_JITTER),
                rng.gen_range(-CLUSTER_JITTER..=CLUSTER_JITTER),
            );
            map.add_shadow(pos);
            if map.shadow_count() >= target {
                break;
            }
        }
    }
    if map.shadow_count() < target {
        warn!(shaded = map.shadow_count(), target, "shadow budget exhausted");
    }
    map.shadow_count()
}

fn open_cells_around(map: &GridMap, center: Position) -> usize {
    let mut open = 0;
    for dy in -2..=2 {
        for dx in -2..=2 {
            if map.is_walkable(center.offset(dx, dy)) {
                open += 1;
            }
        }
    }
    open
}

/// Drop short straight or L-shaped wall pieces into wide open areas
///
/// Cells inside `protected` are never walled. Connectivity must be
/// re-verified afterwards. Returns the number of cells walled.
pub fn add_cover(map: &mut GridMap, protected: &Room, rng: &mut ChaCha8Rng) -> usize {
    let mut placed = 0;
    let height = map.height;
    let width = map.width;

    for y in (3..(height - 3).max(3)).step_by(COVER_STRIDE) {
        for x in (3..(width - 3).max(3)).step_by(COVER_STRIDE) {
            let anchor = Position::new(x, y);
            if open_cells_around(map, anchor) <= COVER_OPENNESS || rng.gen::<f32>() >= COVER_CHANCE {
                continue;
            }

            let piece: Vec<Position> = if rng.gen_bool(0.5) {
                // Straight, horizontal or vertical
                if rng.gen_bool(0.5) {
                    vec![anchor, anchor.offset(1, 0)]
                } else {
                    vec![anchor, anchor.offset(0, 1)]
                }
            } else if rng.gen_bool(0.5) {
                vec![anchor, anchor.offset(1, 0), anchor.offset(0, 1)]
            } else {
                vec![anchor]
            };

            for pos in piece {
                if !protected.contains(pos) && map.set_wall(pos) {
                    placed += 1;
                }
            }
        }
    }
    placed
}
