//! Game history: the move log, replay, and persistence.
//!
//! ## Key Types
//!
//! - `Game`: a record plus the position at its history cursor
//! - `GameRecord`: players, rules, deal, and moves; the persisted form

pub mod game;
pub mod record;

pub use game::Game;
pub use record::{GameRecord, RecordError};
