//! Battleline rules: turns, moves, and the position they act on.
//!
//! ## Key Types
//!
//! - `Position`: aggregate root; validates and applies one move at a time
//! - `Move` / `MoveOutcome`: the move sum type and its reported side effects
//! - `Turn` / `TurnState`: whose turn it is and which move shape is legal
//! - `Deal`: deck orders and the starting player

pub mod deal;
pub mod moves;
pub mod position;
pub mod turn;

pub use deal::Deal;
pub use moves::{ClaimFailures, FlagSet, Move, MoveOutcome, Returned};
pub use position::{Position, PositionBuilder};
pub use turn::{Turn, TurnState, SCOUT_EXTRA_DRAWS, SCOUT_RETURNS};
