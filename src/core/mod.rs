//! Core engine types: players, configuration, errors, RNG.
//!
//! These are the leaves every other module builds on. Nothing here knows
//! about cards or flags beyond the constants and error payloads.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{GameConfig, TableConfig, FLAG_COUNT};
pub use error::{EngineError, EngineResult, InvalidMove, InvariantViolation};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
