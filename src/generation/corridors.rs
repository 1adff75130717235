//! Corridors between rooms

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::types::Position;
use crate::generation::rooms::Room;
use crate::grid::map::GridMap;

fn carve_horizontal(map: &mut GridMap, x1: i32, x2: i32, y: i32, width: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        for dy in 0..width {
            map.carve(Position::new(x, y + dy));
        }
    }
}

fn carve_vertical(map: &mut GridMap, y1: i32, y2: i32, x: i32, width: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        for dx in 0..width {
            map.carve(Position::new(x + dx, y));
        }
    }
}

/// L-shaped corridor between two room centers
///
/// Width is 1 (70%) or 2; the bend goes horizontal-first or vertical-first at
/// random.
pub fn carve_corridor(map: &mut GridMap, a: Position, b: Position, rng: &mut ChaCha8Rng) {
    let width = if rng.gen::<f32>() < 0.7 { 1 } else { 2 };
    if rng.gen_bool(0.5) {
        carve_horizontal(map, a.x, b.x, a.y, width);
        carve_vertical(map, a.y, b.y, b.x, width);
    } else {
        carve_vertical(map, a.y, b.y, a.x, width);
        carve_horizontal(map, a.x, b.x, b.y, width);
    }
}

/// Join every room into one tree, nearest pair first
///
/// Distances are Manhattan between room centers. Ties resolve to the
/// earliest pair in room order.
pub fn connect_rooms(map: &mut GridMap, rooms: &[Room], rng: &mut ChaCha8Rng) -> usize {
    if rooms.len() < 2 {
        return 0;
    }

    let mut connected: Vec<usize> = vec![0];
    let mut unconnected: Vec<usize> = (1..rooms.len()).collect();
    let mut corridors = 0;

    while !unconnected.is_empty() {
        let mut best: Option<(i32, usize, usize)> = None;
        for &c in &connected {
            let from = rooms[c].center();
            for (slot, &u) in unconnected.iter().enumerate() {
                let dist = from.manhattan(&rooms[u].center());
                if best.map_or(true, |(d, _, _)| dist < d) {
                    best = Some((dist, c, slot));
                }
            }
        }

        let Some((_, c, slot)) = best else {
            break;
        };
        let u = unconnected.remove(slot);
        carve_corridor(map, rooms[c].center(), rooms[u].center(), rng);
        connected.push(u);
        corridors += 1;
    }
    corridors
}

/// Extra corridors between random room pairs to create loops
pub fn add_loops(map: &mut GridMap, rooms: &[Room], rng: &mut ChaCha8Rng) -> usize {
    if rooms.len() < 3 {
        return 0;
    }
    let count = rng.gen_range(3..=6).min(rooms.len() / 2);
    let mut added = 0;
    for _ in 0..count {
        let a = rng.gen_range(0..rooms.len());
        let b = rng.gen_range(0..rooms.len());
        if a != b {
            carve_corridor(map, rooms[a].center(), rooms[b].center(), rng);
            added += 1;
        }
    }
    added
}
