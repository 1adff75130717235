//! Connectivity verification, repair and pocket sealing

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::core::types::Position;
use crate::grid::map::GridMap;
use crate::grid::pathfinding::reachable_from;

/// Floor cell farthest (Manhattan) from `origin`; ties go to row-major order
pub fn farthest_floor(map: &GridMap, origin: Position) -> Option<Position> {
    let mut best: Option<(i32, Position)> = None;
    for pos in map.floor_cells() {
        let dist = origin.manhattan(&pos);
        if best.map_or(true, |(d, _)| dist > d) {
            best = Some((dist, pos));
        }
    }
    best.map(|(_, pos)| pos)
}

/// Carve a cardinal random walk from `from` to `to`, biased toward the target
///
/// Every step closes the gap on one axis, so the walk always arrives.
pub fn carve_repair_path(map: &mut GridMap, from: Position, to: Position, rng: &mut ChaCha8Rng) {
    let mut current = from;
    map.carve(current);
    while current != to {
        let sx = (to.x - current.x).signum();
        let sy = (to.y - current.y).signum();
        if sx != 0 && (sy == 0 || rng.gen::<f32>() < 0.7) {
            current.x += sx;
        } else {
            current.y += sy;
        }
        map.carve(current);

        // Widen now and then
        if rng.gen::<f32>() < 0.3 {
            map.carve(current.offset(1, 0));
            map.carve(current.offset(0, 1));
        }
    }
}

/// Turn every floor cell not reachable from `origin` back into wall
pub fn seal_unreachable(map: &mut GridMap, origin: Position) -> usize {
    let reachable = reachable_from(map, origin);
    let mut sealed = 0;
    for pos in map.floor_cells() {
        if !reachable.contains(&pos) && map.set_wall(pos) {
            sealed += 1;
        }
    }
    sealed
}

/// Guarantee the spawn reaches every floor cell
///
/// Connects the spawn to the farthest floor cell (repairing if needed), then
/// seals whatever is still cut off. Returns the number of sealed cells.
pub fn ensure_connected(map: &mut GridMap, spawn: Position, rng: &mut ChaCha8Rng) -> usize {
    map.carve(spawn);
    if let Some(target) = farthest_floor(map, spawn) {
        if !reachable_from(map, spawn).contains(&target) {
            warn!(%spawn, %target, "level disconnected, carving repair path");
            carve_repair_path(map, spawn, target, rng);
        }
    }

    let sealed = seal_unreachable(map, spawn);
    if sealed > 0 {
        debug!(sealed, "sealed unreachable pockets");
    }
    sealed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::pathfinding::is_connected;
    use rand::SeedableRng;

    #[test]
    fn test_farthest_floor() {
        let map = GridMap::new(10, 10);
        assert_eq!(farthest_floor(&map, Position::new(1, 1)), Some(Position::new(8, 8)));
    }

    #[test]
    fn test_repair_path_connects() {
        let mut map = GridMap::filled(20, 20);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let from = Position::new(2, 17);
        let to = Position::new(17, 2);
        carve_repair_path(&mut map, from, to, &mut rng);
        assert!(is_connected(&map, from, to));
    }

    #[test]
    fn test_ensure_connected_repairs_and_seals() {
        let mut map = GridMap::filled(20, 20);
        let spawn = Position::new(2, 2);
        map.carve(spawn);
        map.carve(Position::new(17, 17));
        map.carve(Position::new(10, 3));
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        ensure_connected(&mut map, spawn, &mut rng);

        let reachable = reachable_from(&map, spawn);
        assert!(reachable.contains(&Position::new(17, 17)));
        for pos in map.floor_cells() {
            assert!(reachable.contains(&pos));
        }
    }

    #[test]
    fn test_seal_unreachable_counts() {
        let mut map = GridMap::new(10, 10);
        for y in 1..9 {
            map.set_wall(Position::new(5, y));
        }
        let sealed = seal_unreachable(&mut map, Position::new(1, 1));
        assert_eq!(sealed, 3 * 8);
    }
}
