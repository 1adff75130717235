//! Detection economy and boss escalation

pub mod boss;
pub mod detection;

pub use boss::choose_boss_spawn;
pub use detection::{passive_trickle_due, DetectionMeter, DETECTION_MAX};
