//! Table arena hosting many independent games.
//!
//! ## Key Types
//!
//! - `TableArena`: live games by `GameId`, seating, archive, saved games
//! - `TableRequest` / `TableResponse`: the message-shaped interface
//! - `SavedGames`: unfinished games persisted across restarts

pub mod arena;

pub use arena::{GameId, PlayerPair, SavedGames, TableArena, TableError, TableRequest, TableResponse};
