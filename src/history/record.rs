//! Persisted game record.
//!
//! A record is everything needed to rebuild a game exactly: the external
//! player ids, the rules, the deal, and the move log. Positions are never
//! stored; loading replays the log.
//!
//! The byte format is a 4-byte magic, a version byte, then the bincode
//! encoding of `GameRecord`.

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{EngineError, GameConfig, InvariantViolation, PlayerId};
use crate::rules::{Deal, Move, Position};

/// Magic bytes for record identification.
const MAGIC: &[u8; 4] = b"BTLN";

/// Current format version.
const VERSION: u8 = 1;

/// Errors loading or replaying a record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("not a game record")]
    BadMagic,

    #[error("unsupported record version {0}")]
    UnsupportedVersion(u8),

    #[error("record encoding failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("malformed deal: {0}")]
    MalformedDeal(InvariantViolation),

    #[error("replay failed at move {index}: {source}")]
    Replay {
        index: usize,
        #[source]
        source: EngineError,
    },
}

/// A complete game record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// External player ids, by seat.
    pub players: [u64; 2],
    pub rules: GameConfig,
    pub deal: Deal,
    pub moves: Vector<Move>,
}

impl GameRecord {
    /// A record with no moves yet.
    #[must_use]
    pub fn new(players: [u64; 2], rules: GameConfig, deal: Deal) -> Self {
        Self {
            players,
            rules,
            deal,
            moves: Vector::new(),
        }
    }

    /// The external id seated at `seat`.
    #[must_use]
    pub fn player(&self, seat: PlayerId) -> u64 {
        self.players[seat.index()]
    }

    /// The seat of an external player id, if they play in this game.
    #[must_use]
    pub fn seat_of(&self, player: u64) -> Option<PlayerId> {
        PlayerId::both().find(|&seat| self.player(seat) == player)
    }

    /// The opening position.
    pub fn initial_position(&self) -> Result<Position, RecordError> {
        Position::from_deal(&self.deal, self.rules).map_err(RecordError::MalformedDeal)
    }

    /// Replay the first `upto` moves.
    pub fn replay_to(&self, upto: usize) -> Result<Position, RecordError> {
        let mut position = self.initial_position()?;
        for (index, mv) in self.moves.iter().take(upto).enumerate() {
            position
                .apply(mv)
                .map_err(|source| RecordError::Replay { index, source })?;
        }
        Ok(position)
    }

    /// Replay the whole log.
    pub fn replay(&self) -> Result<Position, RecordError> {
        self.replay_to(self.moves.len())
    }

    /// Encode the record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        let mut bytes = Vec::with_capacity(64 + self.moves.len() * 8);
        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bincode::serialize_into(&mut bytes, self)?;
        Ok(bytes)
    }

    /// Decode a record and check that it replays.
    ///
    /// The replayed position is dropped; use `decode` to keep it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        Self::decode(bytes).map(|(record, _)| record)
    }

    /// Decode a record together with the position at the end of its log.
    pub fn decode(bytes: &[u8]) -> Result<(Self, Position), RecordError> {
        let body = bytes.strip_prefix(MAGIC.as_slice()).ok_or(RecordError::BadMagic)?;
        let (&version, body) = body.split_first().ok_or(RecordError::BadMagic)?;
        if version != VERSION {
            return Err(RecordError::UnsupportedVersion(version));
        }

        let record: Self = bincode::deserialize(body)?;
        let position = record.replay()?;
        Ok((record, position))
    }
}
