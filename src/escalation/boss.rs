//! Boss spawn placement

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::core::config::RunConfig;
use crate::core::types::Position;
use crate::grid::map::GridMap;
use crate::sentinel::Sentinel;

/// Margin kept between random boss candidates and the map edge
const SPAWN_MARGIN: i32 = 5;

/// Offset of the fallback corner from the far edges
const FALLBACK_INSET: i32 = 10;

fn is_free(pos: Position, map: &GridMap, intruder: Position, sentinels: &[Sentinel]) -> bool {
    map.is_walkable(pos)
        && !map.has_feature(pos)
        && pos != intruder
        && sentinels.iter().all(|s| s.pos != pos)
}

/// Choose where the boss appears
///
/// Random candidates must be free and farther than the configured minimum
/// from the intruder; one of the valid candidates is picked at random. If
/// none qualifies, the fixed far corner is used, or the nearest free cell
/// to it.
pub fn choose_boss_spawn(
    map: &GridMap,
    intruder: Position,
    sentinels: &[Sentinel],
    config: &RunConfig,
    rng: &mut impl Rng,
) -> Option<Position> {
    let max_x = map.width - SPAWN_MARGIN;
    let max_y = map.height - SPAWN_MARGIN;

    let mut candidates = Vec::new();
    if max_x >= SPAWN_MARGIN && max_y >= SPAWN_MARGIN {
        for _ in 0..config.boss_spawn_attempts {
            let pos = Position::new(
                rng.gen_range(SPAWN_MARGIN..=max_x),
                rng.gen_range(SPAWN_MARGIN..=max_y),
            );
            if is_free(pos, map, intruder, sentinels)
                && pos.distance(&intruder) > config.boss_min_distance
            {
                candidates.push(pos);
            }
        }
    }

    if let Some(pos) = candidates.choose(rng) {
        return Some(*pos);
    }

    let corner = Position::new(
        (map.width - FALLBACK_INSET).clamp(1, (map.width - 2).max(1)),
        (map.height - FALLBACK_INSET).clamp(1, (map.height - 2).max(1)),
    );
    warn!(%corner, "no boss candidate qualified, falling back to corner");
    nearest_free(corner, map, intruder, sentinels)
}

/// Scan rings of growing radius around `origin` for a free cell
fn nearest_free(
    origin: Position,
    map: &GridMap,
    intruder: Position,
    sentinels: &[Sentinel],
) -> Option<Position> {
    let max_radius = map.width.max(map.height);
    for radius in 0..=max_radius {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs().max(dy.abs()) != radius {
                    continue;
                }
                let pos = origin.offset(dx, dy);
                if is_free(pos, map, intruder, sentinels) {
                    return Some(pos);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SentinelId;
    use crate::sentinel::Archetype;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_respects_distance() {
        let map = GridMap::new(50, 50);
        let config = RunConfig::default();
        let intruder = Position::new(5, 5);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let pos = choose_boss_spawn(&map, intruder, &[], &config, &mut rng).unwrap();
            assert!(map.is_walkable(pos));
            assert!(pos.distance(&intruder) > 15);
        }
    }

    #[test]
    fn test_fallback_corner_when_room_is_small() {
        let map = GridMap::new(20, 20);
        let config = RunConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // Nothing on a 20x20 map is more than 15 away from the middle, and the
        // corner cell is the intruder's own, so the first free ring cell wins
        let pos = choose_boss_spawn(&map, Position::new(10, 10), &[], &config, &mut rng);
        assert_eq!(pos, Some(Position::new(9, 9)));
    }

    #[test]
    fn test_fallback_skips_occupied_corner() {
        let mut map = GridMap::new(20, 20);
        map.set_wall(Position::new(11, 10));
        let config = RunConfig {
            boss_spawn_attempts: 0,
            ..RunConfig::default()
        };
        let blocker = Sentinel::new(SentinelId::new(1), Archetype::Scanner, Position::new(10, 10));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pos = choose_boss_spawn(&map, Position::new(3, 3), &[blocker], &config, &mut rng)
            .unwrap();
        assert_eq!(pos.distance(&Position::new(10, 10)), 1);
        assert_ne!(pos, Position::new(11, 10));
    }
}
