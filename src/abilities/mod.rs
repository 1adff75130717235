//! Intruder abilities: the immutable catalog
//!
//! Effects are applied by the command layer in `simulation::commands`.

pub mod catalog;

pub use catalog::{AbilityCategory, AbilityDef, AbilityId, Targeting};
