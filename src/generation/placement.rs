//! Entity and feature placement on a finished layout

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::abilities::AbilityId;
use crate::core::types::{Position, SentinelId};
use crate::generation::rooms::Room;
use crate::grid::map::GridMap;
use crate::grid::pickup::{PatchColor, Pickup};
use crate::sentinel::{Archetype, MovementStrategy, Sentinel};

/// Minimum Chebyshev distance from the spawn (exclusive)
pub const NODE_MIN_DISTANCE: i32 = 8;
pub const PICKUP_MIN_DISTANCE: i32 = 5;
pub const SENTINEL_MIN_DISTANCE: i32 = 12;

/// Patrol waypoints stay this far inside the border
const PATROL_MARGIN: i32 = 3;
const PATROL_STEP_ATTEMPTS: u32 = 30;

/// Cells already claimed by an entity
#[derive(Debug, Default)]
pub struct Occupancy {
    cells: AHashSet<Position>,
}

impl Occupancy {
    pub fn with_spawn(spawn: Position) -> Self {
        let mut cells = AHashSet::new();
        cells.insert(spawn);
        Self { cells }
    }

    pub fn claim(&mut self, pos: Position) {
        self.cells.insert(pos);
    }

    pub fn is_taken(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Free floor: walkable, unshaded, featureless and unclaimed
fn is_open(map: &GridMap, occupancy: &Occupancy, pos: Position) -> bool {
    map.is_walkable(pos) && !map.is_shadow(pos) && !map.has_feature(pos) && !occupancy.is_taken(pos)
}

/// Random floor draws, then a row-major scan if every draw failed
fn find_spot(
    map: &GridMap,
    floor: &[Position],
    occupancy: &Occupancy,
    spawn: Position,
    min_distance: i32,
    attempts: u32,
    rng: &mut ChaCha8Rng,
) -> Option<Position> {
    if floor.is_empty() {
        return None;
    }
    let valid = |pos: Position| is_open(map, occupancy, pos) && pos.distance(&spawn) > min_distance;

    for _ in 0..attempts {
        let pos = floor[rng.gen_range(0..floor.len())];
        if valid(pos) {
            return Some(pos);
        }
    }
    floor.iter().copied().find(|p| valid(*p))
}

/// Place the exit in the room center farthest from spawn
///
/// Falls back to the farthest valid floor cell, and as a last resort clears
/// shadow from the farthest floor cell.
pub fn place_gateway(map: &mut GridMap, rooms: &[Room], spawn: Position) -> Option<Position> {
    let occupancy = Occupancy::with_spawn(spawn);
    let far_first = |a: &Position, b: &Position| {
        b.distance(&spawn)
            .cmp(&a.distance(&spawn))
            .then_with(|| b.manhattan(&spawn).cmp(&a.manhattan(&spawn)))
            .then_with(|| a.cmp(b))
    };

    let mut centers: Vec<Position> = rooms.iter().skip(1).map(|r| r.center()).collect();
    centers.sort_by(far_first);
    if let Some(pos) = centers.into_iter().find(|p| is_open(map, &occupancy, *p)) {
        map.set_gateway(pos);
        return Some(pos);
    }

    let mut floor = map.floor_cells();
    floor.sort_by(far_first);
    if let Some(pos) = floor.iter().copied().find(|p| is_open(map, &occupancy, *p)) {
        warn!(%pos, "no room center fits the gateway, using farthest floor cell");
        map.set_gateway(pos);
        return Some(pos);
    }

    let pos = floor.into_iter().find(|p| *p != spawn && !map.has_feature(*p))?;
    warn!(%pos, "gateway forced onto shaded cell");
    map.clear_shadow(pos);
    map.set_gateway(pos).then_some(pos)
}

/// Cooling and restore nodes, chosen by coin flip
pub fn place_nodes(
    map: &mut GridMap,
    count: u32,
    spawn: Position,
    occupancy: &Occupancy,
    rng: &mut ChaCha8Rng,
) -> u32 {
    let floor = map.floor_cells();
    let mut placed = 0;
    for _ in 0..count {
        let Some(pos) = find_spot(map, &floor, occupancy, spawn, NODE_MIN_DISTANCE, 100, rng) else {
            warn!(placed, count, "ran out of room for nodes");
            break;
        };
        if rng.gen_bool(0.5) {
            map.add_cooling(pos);
        } else {
            map.add_restore(pos);
        }
        placed += 1;
    }
    placed
}

/// Data patches of random colour plus ability cartridges
///
/// Cartridges carry abilities outside the starting loadout.
pub fn place_pickups(
    map: &mut GridMap,
    patches: u32,
    cartridges: u32,
    spawn: Position,
    occupancy: &Occupancy,
    rng: &mut ChaCha8Rng,
) -> u32 {
    let floor = map.floor_cells();
    let starting = AbilityId::starting_loadout();
    let cartridge_pool: Vec<AbilityId> = AbilityId::ALL
        .into_iter()
        .filter(|id| !starting.contains(id))
        .collect();

    let mut placed = 0;
    for i in 0..patches + cartridges {
        let pickup = if i < patches {
            Pickup::DataPatch(*PatchColor::ALL.choose(rng).unwrap_or(&PatchColor::Crimson))
        } else {
            match cartridge_pool.choose(rng) {
                Some(id) => Pickup::Ability(*id),
                None => break,
            }
        };
        let Some(pos) = find_spot(map, &floor, occupancy, spawn, PICKUP_MIN_DISTANCE, 150, rng)
        else {
            warn!(placed, "ran out of room for pickups");
            break;
        };
        map.place_pickup(pos, pickup);
        placed += 1;
    }
    placed
}

/// Waypoint loop built by a random walk of 2-5 cell cardinal strides
///
/// Routes hold 3-8 points starting at `start`. Every waypoint is walkable
/// and inside the patrol margin.
pub fn patrol_route(map: &GridMap, start: Position, rng: &mut ChaCha8Rng) -> Vec<Position> {
    let in_margin = |p: Position| {
        p.x >= PATROL_MARGIN
            && p.y >= PATROL_MARGIN
            && p.x < map.width - PATROL_MARGIN
            && p.y < map.height - PATROL_MARGIN
            && map.is_walkable(p)
    };

    let mut route = vec![start];
    let length = rng.gen_range(3..=8);
    let mut current = start;

    for _ in 1..length {
        for _ in 0..PATROL_STEP_ATTEMPTS {
            let stride = rng.gen_range(2..=5);
            let (dx, dy) = *[(0, -stride), (stride, 0), (0, stride), (-stride, 0)]
                .choose(rng)
                .unwrap_or(&(0, stride));
            let next = current.offset(dx, dy);
            if in_margin(next) {
                route.push(next);
                current = next;
                break;
            }
        }
    }

    if route.len() < 3 {
        for offset in [(3, 0), (0, 3), (-3, 0), (0, -3)] {
            let candidate = start.offset(offset.0, offset.1);
            if route.len() < 3 && in_margin(candidate) && !route.contains(&candidate) {
                route.push(candidate);
            }
        }
        while route.len() < 3 {
            route.push(start);
        }
    }
    route
}

/// Weighted random sentinels away from the spawn; patrols get routes
pub fn place_sentinels(
    map: &GridMap,
    count: u32,
    spawn: Position,
    occupancy: &mut Occupancy,
    first_id: u32,
    rng: &mut ChaCha8Rng,
) -> Vec<Sentinel> {
    let floor = map.floor_cells();
    let mut sentinels = Vec::with_capacity(count as usize);

    for i in 0..count {
        let Some(pos) = find_spot(map, &floor, occupancy, spawn, SENTINEL_MIN_DISTANCE, 20, rng)
        else {
            warn!(placed = sentinels.len(), count, "ran out of room for sentinels");
            break;
        };
        occupancy.claim(pos);

        let archetype = Archetype::roll(rng);
        let mut sentinel = Sentinel::new(SentinelId::new(first_id + i), archetype, pos);
        if archetype.profile().movement == MovementStrategy::Patrol {
            sentinel = sentinel.with_patrol(patrol_route(map, pos, rng));
        }
        sentinels.push(sentinel);
    }
    sentinels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_gateway_prefers_far_room_center() {
        let mut map = GridMap::new(30, 30);
        let rooms = vec![
            Room::new(3, 3, 5, 5),
            Room::new(10, 10, 3, 3),
            Room::new(20, 22, 5, 5),
        ];
        let gateway = place_gateway(&mut map, &rooms, Position::new(5, 5));
        assert_eq!(gateway, Some(Position::new(22, 24)));
        assert_eq!(map.gateway(), gateway);
    }

    #[test]
    fn test_gateway_avoids_shadowed_center() {
        let mut map = GridMap::new(30, 30);
        let rooms = vec![Room::new(3, 3, 5, 5), Room::new(10, 10, 3, 3), Room::new(20, 22, 5, 5)];
        map.add_shadow(Position::new(22, 24));
        let gateway = place_gateway(&mut map, &rooms, Position::new(5, 5));
        assert_eq!(gateway, Some(Position::new(11, 11)));
    }

    #[test]
    fn test_nodes_keep_distance() {
        let mut map = GridMap::new(40, 40);
        let spawn = Position::new(5, 5);
        let occupancy = Occupancy::with_spawn(spawn);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(place_nodes(&mut map, 6, spawn, &occupancy, &mut rng), 6);
        for pos in map.cooling_tiles().into_iter().chain(map.restore_tiles()) {
            assert!(pos.distance(&spawn) > NODE_MIN_DISTANCE);
        }
    }

    #[test]
    fn test_fallback_scan_when_draws_fail() {
        let mut map = GridMap::filled(30, 30);
        let only = Position::new(20, 20);
        map.carve(only);
        let spawn = Position::new(5, 5);
        let occupancy = Occupancy::with_spawn(spawn);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(place_nodes(&mut map, 3, spawn, &occupancy, &mut rng), 1);
        assert!(map.has_feature(only));
    }

    #[test]
    fn test_patrol_route_shape() {
        let map = GridMap::new(40, 40);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let start = Position::new(20, 20);
            let route = patrol_route(&map, start, &mut rng);
            assert!((3..=8).contains(&route.len()));
            assert_eq!(route[0], start);
            for p in &route {
                assert!(map.is_walkable(*p));
            }
        }
    }

    #[test]
    fn test_patrol_route_in_a_closet_duplicates_start() {
        let mut map = GridMap::filled(20, 20);
        let start = Position::new(10, 10);
        map.carve(start);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(patrol_route(&map, start, &mut rng), vec![start, start, start]);
    }

    #[test]
    fn test_sentinels_do_not_share_cells() {
        let map = GridMap::new(50, 50);
        let spawn = Position::new(5, 5);
        let mut occupancy = Occupancy::with_spawn(spawn);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let sentinels = place_sentinels(&map, 16, spawn, &mut occupancy, 1, &mut rng);
        assert_eq!(sentinels.len(), 16);
        let cells: AHashSet<Position> = sentinels.iter().map(|s| s.pos).collect();
        assert_eq!(cells.len(), 16);
        for s in &sentinels {
            assert!(s.pos.distance(&spawn) > SENTINEL_MIN_DISTANCE);
            assert!(!s.is_boss());
        }
    }
}
