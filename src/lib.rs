//! # battleline
//!
//! A rules engine for the two-player card game Battleline: nine flags, three
//! card formations, and tactic cards that bend the rules.
//!
//! ## Design Principles
//!
//! 1. **Deal plus moves is the game**: a position is a pure function of the
//!    initial deal and the ordered move log. Replay, scrolling, and
//!    persistence all rebuild from that pair.
//!
//! 2. **Card conservation by construction**: every card lies in exactly one
//!    zone, and every effect is a checked relocation between zones.
//!
//! 3. **Validate, then mutate**: a move is applied only if it is a member of
//!    the current legal set. Rejected moves leave the position untouched.
//!
//! ## Modules
//!
//! - `core`: players, configuration, errors, deterministic RNG
//! - `cards`: card identities, kinds, and the static registry
//! - `zones`: the location table
//! - `flags`: formations, flags, and claim adjudication
//! - `rules`: turn state machine, moves, and the position
//! - `history`: move log, replay, and persisted records
//! - `tables`: arena of live games

pub mod cards;
pub mod core;
pub mod flags;
pub mod history;
pub mod rules;
pub mod tables;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    EngineError, EngineResult, GameConfig, GameRng, InvalidMove, InvariantViolation, PlayerId,
    PlayerMap, TableConfig,
};

pub use crate::cards::{CardIx, CardKind, Color, DeckKind, Tactic, TacticClass};

pub use crate::zones::{LocationTable, Zone, ZonePosition};

pub use crate::flags::{ClaimState, ClaimVerdict, Flag, FlagId, FormationKind, Strength};

pub use crate::rules::{ClaimFailures, Deal, Move, MoveOutcome, Position, PositionBuilder, Turn, TurnState};

pub use crate::history::{Game, GameRecord, RecordError};

pub use crate::tables::{GameId, SavedGames, TableArena, TableError, TableRequest, TableResponse};
