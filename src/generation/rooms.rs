//! Room placement

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Position;
use crate::generation::params::LevelParams;
use crate::grid::map::GridMap;

/// Gap kept between rooms during the main placement pass
const ROOM_PADDING: i32 = 1;

/// Half-size of the protected chamber around the spawn point
const SPAWN_CHAMBER_RADIUS: i32 = 2;

/// Axis-aligned rectangle of floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.x < self.x + self.w && pos.y >= self.y && pos.y < self.y + self.h
    }

    /// Do the rectangles intersect once this one is grown by `padding`?
    pub fn overlaps(&self, other: &Room, padding: i32) -> bool {
        let (x, y) = (self.x - padding, self.y - padding);
        let (w, h) = (self.w + 2 * padding, self.h + 2 * padding);
        !(x + w <= other.x || x >= other.x + other.w || y + h <= other.y || y >= other.y + other.h)
    }

    pub fn carve(&self, map: &mut GridMap) {
        for y in self.y..self.y + self.h {
            for x in self.x..self.x + self.w {
                map.carve(Position::new(x, y));
            }
        }
    }
}

/// Chamber carved around the spawn point before anything else
pub fn spawn_chamber(params: &LevelParams) -> Room {
    let size = 2 * SPAWN_CHAMBER_RADIUS + 1;
    let x = (params.spawn.x - SPAWN_CHAMBER_RADIUS).clamp(1, (params.width - 1 - size).max(1));
    let y = (params.spawn.y - SPAWN_CHAMBER_RADIUS).clamp(1, (params.height - 1 - size).max(1));
    Room::new(x, y, size, size)
}

/// Tiered size draw: 15% huge, 25% large, 30% medium, 30% small
fn roll_room_size(rng: &mut ChaCha8Rng) -> (i32, i32) {
    let roll = rng.gen::<f32>();
    let (lo, hi) = if roll < 0.15 {
        (10, 14)
    } else if roll < 0.40 {
        (7, 10)
    } else if roll < 0.70 {
        (5, 7)
    } else {
        (3, 5)
    };
    (rng.gen_range(lo..=hi), rng.gen_range(lo..=hi))
}

/// Random origin that keeps the room inside the border
fn roll_origin(map: &GridMap, w: i32, h: i32, rng: &mut ChaCha8Rng) -> Option<(i32, i32)> {
    let max_x = map.width - w - 1;
    let max_y = map.height - h - 1;
    if max_x < 1 || max_y < 1 {
        return None;
    }
    Some((rng.gen_range(1..=max_x), rng.gen_range(1..=max_y)))
}

/// Carve the spawn chamber plus randomly placed rooms
///
/// The spawn chamber is always `rooms[0]`.
pub fn place_rooms(map: &mut GridMap, params: &LevelParams, rng: &mut ChaCha8Rng) -> Vec<Room> {
    let chamber = spawn_chamber(params);
    chamber.carve(map);
    let mut rooms = vec![chamber];

    let target = rng.gen_range(params.min_rooms..=params.max_rooms.max(params.min_rooms)) as usize;
    let mut attempts = 0;
    while rooms.len() - 1 < target && attempts < params.room_attempts {
        attempts += 1;
        let (w, h) = roll_room_size(rng);
        let Some((x, y)) = roll_origin(map, w, h, rng) else {
            continue;
        };
        let candidate = Room::new(x, y, w, h);
        if rooms.iter().any(|r| candidate.overlaps(r, ROOM_PADDING)) {
            continue;
        }
        candidate.carve(map);
        rooms.push(candidate);
    }

    // Fill leftover space with small rooms
    for _ in 0..params.fill_attempts {
        let (w, h) = (rng.gen_range(2..=4), rng.gen_range(2..=4));
        let Some((x, y)) = roll_origin(map, w, h, rng) else {
            continue;
        };
        let candidate = Room::new(x, y, w, h);
        if rooms.iter().any(|r| candidate.overlaps(r, 0)) {
            continue;
        }
        candidate.carve(map);
        rooms.push(candidate);
    }

    rooms
}
