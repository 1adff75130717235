//! Line of sight, observation rules and visibility queries

pub mod los;
pub mod observe;
pub mod overlay;

pub use los::{bresenham_line, line_of_sight};
pub use observe::{can_observe, effective_vision};
pub use overlay::{intruder_sight_range, visible_sentinels, vision_overlay};
