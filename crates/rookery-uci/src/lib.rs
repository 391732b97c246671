//! UCI protocol handling for rookery.

pub mod command;
pub mod engine;
pub mod error;

pub use command::{Command, GoParams, parse_command};
pub use engine::{EngineConfig, UciEngine};
pub use error::UciError;
