//! Run state, the turn scheduler and the intruder command surface

pub mod commands;
pub mod run_state;
pub mod turn;

pub use run_state::{level_seed, RunOutcome, RunSnapshot, RunState};
pub use turn::{process_turn, TurnEvent, TurnReport};
