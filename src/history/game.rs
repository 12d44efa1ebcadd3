//! A game: record plus the position at the history cursor.
//!
//! The position is always the fold of the deal and `moves[0..cursor]`.
//! Scrolling backward rebuilds from the deal rather than undoing a move, so
//! no move needs an inverse.

use tracing::debug;

use super::record::{GameRecord, RecordError};
use crate::core::{EngineResult, GameConfig, InvalidMove, InvariantViolation, PlayerId};
use crate::rules::{Deal, Move, MoveOutcome, Position};

/// One game with its history.
#[derive(Clone, Debug)]
pub struct Game {
    record: GameRecord,
    position: Position,
    cursor: usize,
}

impl Game {
    /// Start a new game.
    pub fn new(players: [u64; 2], rules: GameConfig, deal: Deal) -> Result<Self, InvariantViolation> {
        let position = Position::from_deal(&deal, rules)?;
        Ok(Self {
            record: GameRecord::new(players, rules, deal),
            position,
            cursor: 0,
        })
    }

    /// Rebuild a game from its record, with the cursor at the end.
    pub fn from_record(record: GameRecord) -> Result<Self, RecordError> {
        let position = record.replay()?;
        let cursor = record.moves.len();
        Ok(Self {
            record,
            position,
            cursor,
        })
    }

    /// Load a game from record bytes, replaying the log once.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        let (record, position) = GameRecord::decode(bytes)?;
        let cursor = record.moves.len();
        Ok(Self {
            record,
            position,
            cursor,
        })
    }

    #[must_use]
    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    /// Drop the cached position, keeping the record.
    #[must_use]
    pub fn into_record(self) -> GameRecord {
        self.record
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.record.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.moves.is_empty()
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.cursor == self.len()
    }

    /// The winner at the cursor.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.position.winner()
    }

    // === Playing ===

    /// Apply a move and append it to the history.
    pub fn play(&mut self, mv: Move) -> EngineResult<MoveOutcome> {
        if !self.is_at_end() {
            return Err(InvalidMove::HistoryNotAtEnd {
                cursor: self.cursor,
                len: self.len(),
            }
            .into());
        }
        let outcome = self.position.apply(&mv)?;
        self.record.moves.push_back(mv);
        self.cursor += 1;
        Ok(outcome)
    }

    /// Apply the `index`-th legal move and append it.
    pub fn play_index(&mut self, index: usize) -> EngineResult<(Move, MoveOutcome)> {
        let moves = self.position.legal_moves();
        let mv = moves.get(index).cloned().ok_or(InvalidMove::IndexOutOfRange {
            index,
            len: moves.len(),
        })?;
        let outcome = self.play(mv.clone())?;
        Ok((mv, outcome))
    }

    /// Record a pause.
    pub fn pause(&mut self) -> EngineResult<()> {
        self.play(Move::Pause).map(|_| ())
    }

    /// Concede on behalf of the player to move.
    pub fn give_up(&mut self) -> EngineResult<MoveOutcome> {
        self.play(Move::GiveUp)
    }

    /// Scroll to the end and drop a trailing pause.
    pub fn resume(&mut self) -> EngineResult<()> {
        self.scroll_to(self.len())?;
        if self.record.moves.back() == Some(&Move::Pause) {
            self.record.moves.pop_back();
            self.cursor -= 1;
            debug!(moves = self.len(), "resumed paused game");
        }
        Ok(())
    }

    // === Scrolling ===

    /// Reapply the move at the cursor. `None` at the end of history.
    pub fn scroll_forward(&mut self) -> EngineResult<Option<MoveOutcome>> {
        let Some(mv) = self.record.moves.get(self.cursor) else {
            return Ok(None);
        };
        let outcome = self.position.apply(mv)?;
        self.cursor += 1;
        Ok(Some(outcome))
    }

    /// Step back one move by replaying from the deal. `false` at the start.
    pub fn scroll_backward(&mut self) -> EngineResult<bool> {
        if self.cursor == 0 {
            return Ok(false);
        }
        self.position = self.rebuild(self.cursor - 1)?;
        self.cursor -= 1;
        Ok(true)
    }

    /// Move the cursor to `target`, clamped to the history length.
    pub fn scroll_to(&mut self, target: usize) -> EngineResult<()> {
        let target = target.min(self.len());
        if target < self.cursor {
            self.position = self.rebuild(target)?;
            self.cursor = target;
        }
        while self.cursor < target {
            self.scroll_forward()?;
        }
        Ok(())
    }

    fn rebuild(&self, upto: usize) -> EngineResult<Position> {
        let mut position = Position::from_deal(&self.record.deal, self.record.rules)?;
        for mv in self.record.moves.iter().take(upto) {
            position.apply(mv)?;
        }
        Ok(position)
    }
}

impl TryFrom<GameRecord> for Game {
    type Error = RecordError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}
