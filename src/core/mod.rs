pub mod config;
pub mod error;
pub mod types;

pub use config::RunConfig;
pub use error::{CommandError, Result, SignalError};
pub use types::{Position, SentinelId, Turn};
