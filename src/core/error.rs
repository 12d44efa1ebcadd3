//! Engine error types.
//!
//! Two disjoint classes:
//!
//! - `InvariantViolation`: a location-table or relocation precondition does
//!   not hold. Never caused by legal input; fatal for the game instance.
//! - `InvalidMove`: the caller offered something outside the current legal
//!   set. Recoverable; the position is untouched.
//!
//! A claim that is not yet provable is neither: it is reported in the move
//! outcome together with counter-evidence.

use thiserror::Error;

use crate::cards::{CardIx, DeckKind};
use crate::rules::{Move, TurnState};
use crate::zones::Zone;

/// A broken location-table precondition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("card {card} expected in {expected} but found in {actual}")]
    Misplaced {
        card: CardIx,
        expected: Zone,
        actual: Zone,
    },

    #[error("cannot deal from the empty {0} deck")]
    EmptyDeck(DeckKind),

    #[error("card conservation broken: {0}")]
    Conservation(String),
}

/// A move outside the current legal set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("{mv:?} is not legal in state {state:?}")]
    NotLegal { mv: Move, state: TurnState },

    #[error("move index {index} out of range ({len} legal moves)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("the game is over")]
    GameOver,

    #[error("history cursor at {cursor} of {len} moves; scroll to the end before playing")]
    HistoryNotAtEnd { cursor: usize, len: usize },
}

/// Any error raised while applying a move.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl EngineError {
    /// Whether the game instance must be torn down.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Invariant(_))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        let invalid: EngineError = InvalidMove::GameOver.into();
        let fatal: EngineError = InvariantViolation::EmptyDeck(DeckKind::Troop).into();

        assert!(!invalid.is_fatal());
        assert!(fatal.is_fatal());
    }

    #[test]
    fn test_display() {
        let err = InvariantViolation::EmptyDeck(DeckKind::Tactic);
        assert_eq!(err.to_string(), "cannot deal from the empty tactic deck");

        let err = InvalidMove::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "move index 4 out of range (2 legal moves)");
    }
}
