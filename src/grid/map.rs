//! Bounded tile grid with walls, shadow cover and special features
//!
//! Tile classes are stored as coordinate sets. The border is always wall,
//! and wall, shadow and feature tiles never overlap. Every mutator upholds
//! both rules and reports whether it changed anything.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::types::Position;
use crate::grid::pickup::Pickup;

/// Classification of one cell for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    Shadow,
    Cooling,
    Restore,
    Pickup,
    Gateway,
    OutOfBounds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    walls: AHashSet<Position>,
    shadow_tiles: AHashSet<Position>,
    cooling_tiles: AHashSet<Position>,
    restore_tiles: AHashSet<Position>,
    gateway: Option<Position>,
    #[serde(with = "pickup_list")]
    pickups: AHashMap<Position, Pickup>,
}

/// Pickups serialize as a position-ordered list so text formats with
/// string-only map keys can hold them
mod pickup_list {
    use ahash::AHashMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::core::types::Position;
    use crate::grid::pickup::Pickup;

    pub fn serialize<S: Serializer>(
        pickups: &AHashMap<Position, Pickup>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut list: Vec<(Position, Pickup)> = pickups.iter().map(|(p, k)| (*p, *k)).collect();
        list.sort_by_key(|(p, _)| *p);
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<AHashMap<Position, Pickup>, D::Error> {
        let list: Vec<(Position, Pickup)> = Vec::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}

impl PartialEq for GridMap {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && *self.walls == *other.walls
            && *self.shadow_tiles == *other.shadow_tiles
            && *self.cooling_tiles == *other.cooling_tiles
            && *self.restore_tiles == *other.restore_tiles
            && self.gateway == other.gateway
            && *self.pickups == *other.pickups
    }
}

impl GridMap {
    /// Open room: border walls, floor everywhere else
    pub fn new(width: i32, height: i32) -> Self {
        let mut map = Self::empty(width, height);
        for x in 0..width {
            map.walls.insert(Position::new(x, 0));
            map.walls.insert(Position::new(x, height - 1));
        }
        for y in 0..height {
            map.walls.insert(Position::new(0, y));
            map.walls.insert(Position::new(width - 1, y));
        }
        map
    }

    /// Solid rock: every cell is wall. Generation carves into this.
    pub fn filled(width: i32, height: i32) -> Self {
        let mut map = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                map.walls.insert(Position::new(x, y));
            }
        }
        map
    }

    fn empty(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            walls: AHashSet::new(),
            shadow_tiles: AHashSet::new(),
            cooling_tiles: AHashSet::new(),
            restore_tiles: AHashSet::new(),
            gateway: None,
            pickups: AHashMap::new(),
        }
    }

    // === QUERIES ===

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn is_border(&self, pos: Position) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x == self.width - 1 || pos.y == self.height - 1
    }

    /// Out-of-bounds cells count as wall
    pub fn is_wall(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.walls.contains(&pos)
    }

    /// Out-of-bounds cells are never shadow
    pub fn is_shadow(&self, pos: Position) -> bool {
        self.shadow_tiles.contains(&pos)
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.in_bounds(pos) && !self.walls.contains(&pos)
    }

    pub fn is_cooling(&self, pos: Position) -> bool {
        self.cooling_tiles.contains(&pos)
    }

    pub fn is_restore(&self, pos: Position) -> bool {
        self.restore_tiles.contains(&pos)
    }

    pub fn pickup_at(&self, pos: Position) -> Option<&Pickup> {
        self.pickups.get(&pos)
    }

    pub fn gateway(&self) -> Option<Position> {
        self.gateway
    }

    pub fn is_gateway(&self, pos: Position) -> bool {
        self.gateway == Some(pos)
    }

    /// Cooling node, restore node, pickup or gateway
    pub fn has_feature(&self, pos: Position) -> bool {
        self.is_cooling(pos)
            || self.is_restore(pos)
            || self.pickups.contains_key(&pos)
            || self.is_gateway(pos)
    }

    pub fn tile_at(&self, pos: Position) -> TileKind {
        if !self.in_bounds(pos) {
            TileKind::OutOfBounds
        } else if self.walls.contains(&pos) {
            TileKind::Wall
        } else if self.is_gateway(pos) {
            TileKind::Gateway
        } else if self.is_cooling(pos) {
            TileKind::Cooling
        } else if self.is_restore(pos) {
            TileKind::Restore
        } else if self.pickups.contains_key(&pos) {
            TileKind::Pickup
        } else if self.is_shadow(pos) {
            TileKind::Shadow
        } else {
            TileKind::Floor
        }
    }

    pub fn shadow_count(&self) -> usize {
        self.shadow_tiles.len()
    }

    pub fn floor_count(&self) -> usize {
        (self.width * self.height) as usize - self.walls.len()
    }

    /// Walkable cells in row-major order
    ///
    /// Generation draws random numbers against this order, so it must not
    /// depend on hash iteration.
    pub fn floor_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if self.is_walkable(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    pub fn cooling_tiles(&self) -> Vec<Position> {
        sorted(&self.cooling_tiles)
    }

    pub fn restore_tiles(&self) -> Vec<Position> {
        sorted(&self.restore_tiles)
    }

    pub fn shadow_tiles(&self) -> Vec<Position> {
        sorted(&self.shadow_tiles)
    }

    /// Pickups ordered by position
    pub fn pickups(&self) -> Vec<(Position, Pickup)> {
        let mut list: Vec<_> = self.pickups.iter().map(|(p, k)| (*p, *k)).collect();
        list.sort_by_key(|(p, _)| *p);
        list
    }

    // === MUTATORS ===

    /// Turn an interior cell into floor
    pub fn carve(&mut self, pos: Position) -> bool {
        if !self.in_bounds(pos) || self.is_border(pos) {
            return false;
        }
        self.walls.remove(&pos)
    }

    /// Turn a cell into wall, dropping any shadow or feature on it
    pub fn set_wall(&mut self, pos: Position) -> bool {
        if !self.in_bounds(pos) || self.walls.contains(&pos) {
            return false;
        }
        self.shadow_tiles.remove(&pos);
        self.clear_feature(pos);
        self.walls.insert(pos);
        true
    }

    pub fn add_shadow(&mut self, pos: Position) -> bool {
        if !self.is_walkable(pos) || self.has_feature(pos) {
            return false;
        }
        self.shadow_tiles.insert(pos)
    }

    pub fn clear_shadow(&mut self, pos: Position) -> bool {
        self.shadow_tiles.remove(&pos)
    }

    pub fn add_cooling(&mut self, pos: Position) -> bool {
        if !self.accepts_feature(pos) {
            return false;
        }
        self.cooling_tiles.insert(pos)
    }

    pub fn add_restore(&mut self, pos: Position) -> bool {
        if !self.accepts_feature(pos) {
            return false;
        }
        self.restore_tiles.insert(pos)
    }

    pub fn place_pickup(&mut self, pos: Position, pickup: Pickup) -> bool {
        if !self.accepts_feature(pos) {
            return false;
        }
        self.pickups.insert(pos, pickup);
        true
    }

    pub fn take_pickup(&mut self, pos: Position) -> Option<Pickup> {
        self.pickups.remove(&pos)
    }

    /// Move the gateway; the previous gateway cell (if any) becomes plain floor
    pub fn set_gateway(&mut self, pos: Position) -> bool {
        if self.gateway == Some(pos) {
            return true;
        }
        let previous = self.gateway.take();
        if !self.accepts_feature(pos) {
            self.gateway = previous;
            return false;
        }
        self.gateway = Some(pos);
        true
    }

    fn accepts_feature(&self, pos: Position) -> bool {
        self.is_walkable(pos) && !self.is_shadow(pos) && !self.has_feature(pos)
    }

    fn clear_feature(&mut self, pos: Position) {
        self.cooling_tiles.remove(&pos);
        self.restore_tiles.remove(&pos);
        self.pickups.remove(&pos);
        if self.gateway == Some(pos) {
            self.gateway = None;
        }
    }
}

fn sorted(set: &AHashSet<Position>) -> Vec<Position> {
    let mut list: Vec<Position> = set.iter().copied().collect();
    list.sort();
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::pickup::{PatchColor, Pickup};

    #[test]
    fn test_new_map_has_wall_border() {
        let map = GridMap::new(10, 8);
        for x in 0..10 {
            assert!(map.is_wall(Position::new(x, 0)));
            assert!(map.is_wall(Position::new(x, 7)));
        }
        assert!(map.is_walkable(Position::new(1, 1)));
        assert_eq!(map.floor_count(), 8 * 6);
    }

    #[test]
    fn test_out_of_bounds_queries() {
        let map = GridMap::new(5, 5);
        let outside = Position::new(-1, 3);
        assert!(map.is_wall(outside));
        assert!(!map.is_shadow(outside));
        assert!(!map.is_walkable(outside));
        assert_eq!(map.tile_at(outside), TileKind::OutOfBounds);
    }

    #[test]
    fn test_border_cannot_be_carved() {
        let mut map = GridMap::filled(6, 6);
        assert!(!map.carve(Position::new(0, 3)));
        assert!(map.carve(Position::new(2, 3)));
        assert!(!map.carve(Position::new(2, 3)));
    }

    #[test]
    fn test_shadow_and_features_are_exclusive() {
        let mut map = GridMap::new(8, 8);
        let pos = Position::new(3, 3);
        assert!(map.add_shadow(pos));
        assert!(!map.add_cooling(pos));
        assert!(!map.set_gateway(pos));

        let other = Position::new(4, 4);
        assert!(map.add_restore(other));
        assert!(!map.add_shadow(other));
        assert!(!map.place_pickup(other, Pickup::DataPatch(PatchColor::Azure)));
        assert!(!map.add_shadow(Position::new(0, 0)));
    }

    #[test]
    fn test_set_wall_clears_overlays() {
        let mut map = GridMap::new(8, 8);
        let pos = Position::new(2, 2);
        map.add_cooling(pos);
        assert!(map.set_wall(pos));
        assert!(!map.is_cooling(pos));
        assert_eq!(map.tile_at(pos), TileKind::Wall);
    }

    #[test]
    fn test_gateway_moves() {
        let mut map = GridMap::new(8, 8);
        assert!(map.set_gateway(Position::new(2, 2)));
        assert!(map.set_gateway(Position::new(5, 5)));
        assert_eq!(map.gateway(), Some(Position::new(5, 5)));
        assert_eq!(map.tile_at(Position::new(2, 2)), TileKind::Floor);

        // Rejected move keeps the old gateway
        assert!(!map.set_gateway(Position::new(0, 0)));
        assert_eq!(map.gateway(), Some(Position::new(5, 5)));
    }

    #[test]
    fn test_take_pickup_removes_it() {
        let mut map = GridMap::new(8, 8);
        let pos = Position::new(3, 4);
        let pickup = Pickup::DataPatch(PatchColor::Violet);
        assert!(map.place_pickup(pos, pickup));
        assert_eq!(map.tile_at(pos), TileKind::Pickup);
        assert_eq!(map.take_pickup(pos), Some(pickup));
        assert_eq!(map.take_pickup(pos), None);
    }

    #[test]
    fn test_floor_cells_are_row_major() {
        let map = GridMap::new(4, 4);
        let cells = map.floor_cells();
        assert_eq!(
            cells,
            vec![
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(1, 2),
                Position::new(2, 2)
            ]
        );
    }
}
