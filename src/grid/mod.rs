//! Tile grid, pickups and grid algorithms

pub mod map;
pub mod pathfinding;
pub mod pickup;

pub use map::{GridMap, TileKind};
pub use pathfinding::{find_path, is_connected, reachable_from};
pub use pickup::{PatchCatalog, PatchColor, PatchEffect, Pickup};
