//! Rogue Signal - turn-based stealth infiltration simulation
//!
//! An intruder crosses procedurally generated network levels while sentinels
//! watch, patrol and hunt. Every stealth and combat outcome feeds one global
//! detection score; crossing its threshold brings out the boss.

pub mod abilities;
pub mod core;
pub mod escalation;
pub mod generation;
pub mod grid;
pub mod intruder;
pub mod sentinel;
pub mod simulation;
pub mod visibility;

pub use crate::core::{CommandError, Position, Result, RunConfig, SentinelId, SignalError};
pub use crate::simulation::{RunOutcome, RunState, TurnEvent, TurnReport};
