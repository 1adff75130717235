use thiserror::Error;

use crate::abilities::AbilityId;
use crate::core::types::Position;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Command rejected: {0}")]
    Command(#[from] CommandError),
}

pub type Result<T> = std::result::Result<T, SignalError>;

/// Why a command was refused
///
/// Every rejection leaves the run state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("the run is over")]
    RunOver,

    #[error("invalid step ({dx}, {dy})")]
    InvalidDirection { dx: i32, dy: i32 },

    #[error("{0} is blocked")]
    Blocked(Position),

    #[error("{0} is outside the grid")]
    OutOfBounds(Position),

    #[error("{0:?} is not loaded")]
    NotEquipped(AbilityId),

    #[error("{0:?} is already loaded")]
    AlreadyEquipped(AbilityId),

    #[error("system too hot: {heat} + {cost} exceeds {limit}")]
    Overheated { heat: i32, cost: i32, limit: i32 },

    #[error("target required")]
    MissingTarget,

    #[error("target {distance} away, range is {range}")]
    OutOfRange { distance: i32, range: i32 },

    #[error("{0} is not a shadow tile")]
    NotShadow(Position),

    #[error("{0} is occupied")]
    Occupied(Position),

    #[error("no sentinel at {0}")]
    NoTarget(Position),

    #[error("loadout needs {needed} units, {available} free")]
    InsufficientLoadout { needed: u32, available: u32 },

    #[error("all {0} loadout slots are in use")]
    LoadoutSlotsFull(usize),

    #[error("no inventory item in slot {0}")]
    EmptySlot(usize),
}
