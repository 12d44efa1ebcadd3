//! Table arena: every live game, indexed by id.
//!
//! The arena seats players, routes move submissions to the right game, and
//! splits finished tables into archived records (games that ended) and
//! saved records (games to resume later). It is a single-owner value; the
//! surrounding server serializes access through `&mut self`.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::core::{EngineError, GameRng, InvariantViolation, TableConfig};
use crate::history::{Game, GameRecord, RecordError};
use crate::rules::{Deal, Move, MoveOutcome};

/// Arena-local game handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game {}", self.0)
    }
}

/// Two external player ids, unordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerPair {
    low: u64,
    high: u64,
}

impl PlayerPair {
    #[must_use]
    pub fn new(players: [u64; 2]) -> Self {
        Self {
            low: players[0].min(players[1]),
            high: players[0].max(players[1]),
        }
    }
}

/// Errors raised by the arena.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("player {0} is already seated at a table")]
    AlreadySeated(u64),

    #[error("player {0} cannot play against themselves")]
    SamePlayer(u64),

    #[error("no {0}")]
    UnknownGame(GameId),

    #[error("player {player} does not play in {game}")]
    NotSeated { game: GameId, player: u64 },

    #[error("player {player} is not to move in {game}")]
    NotYourTurn { game: GameId, player: u64 },

    #[error("rejected move: {0}")]
    Rejected(EngineError),

    #[error("{game} was torn down: {source}")]
    TornDown {
        game: GameId,
        #[source]
        source: EngineError,
    },

    #[error("cannot deal: {0}")]
    Deal(#[from] InvariantViolation),

    #[error("saved game is unusable: {0}")]
    Record(#[from] RecordError),
}

/// Unfinished games awaiting resume, keyed by player pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGames {
    games: FxHashMap<PlayerPair, GameRecord>,
}

impl SavedGames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// The saved game between two players, if any.
    #[must_use]
    pub fn get(&self, players: [u64; 2]) -> Option<&GameRecord> {
        self.games.get(&PlayerPair::new(players))
    }

    pub fn insert(&mut self, record: GameRecord) {
        self.games.insert(PlayerPair::new(record.players), record);
    }

    fn take(&mut self, players: [u64; 2]) -> Option<GameRecord> {
        self.games.remove(&PlayerPair::new(players))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Requests the arena serves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableRequest {
    StartGame { players: [u64; 2] },
    LegalMoves { game: GameId },
    Submit { game: GameId, player: u64, index: usize },
    FinishTable { game: GameId },
}

/// Replies to `TableRequest`s.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableResponse {
    Started(GameId),
    LegalMoves(Vec<Move>),
    Moved(MoveOutcome),
    Finished,
}

/// The arena of live games.
#[derive(Debug)]
pub struct TableArena {
    config: TableConfig,
    rng: GameRng,
    next_id: u64,
    games: FxHashMap<GameId, Game>,
    seated: FxHashMap<u64, GameId>,
    saved: SavedGames,
    archive: VecDeque<GameRecord>,
}

impl TableArena {
    #[must_use]
    pub fn new(config: TableConfig) -> Self {
        Self::with_saved(config, SavedGames::new())
    }

    /// Create an arena that resumes previously saved games.
    #[must_use]
    pub fn with_saved(config: TableConfig, saved: SavedGames) -> Self {
        Self {
            config,
            rng: GameRng::new(config.seed),
            next_id: 0,
            games: FxHashMap::default(),
            seated: FxHashMap::default(),
            saved,
            archive: VecDeque::new(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.get(&id)
    }

    /// The game a player is seated at.
    #[must_use]
    pub fn table_of(&self, player: u64) -> Option<GameId> {
        self.seated.get(&player).copied()
    }

    #[must_use]
    pub fn live_games(&self) -> usize {
        self.games.len()
    }

    /// Every live table with its players, by game id.
    #[must_use]
    pub fn tables(&self) -> Vec<(GameId, [u64; 2])> {
        let mut tables: Vec<_> = self
            .games
            .iter()
            .map(|(&id, game)| (id, game.record().players))
            .collect();
        tables.sort_unstable_by_key(|&(id, _)| id);
        tables
    }

    /// Whether a player is seated at any table.
    #[must_use]
    pub fn is_playing(&self, player: u64) -> bool {
        self.seated.contains_key(&player)
    }

    #[must_use]
    pub fn saved(&self) -> &SavedGames {
        &self.saved
    }

    /// Take the oldest archived record.
    pub fn pop_archived(&mut self) -> Option<GameRecord> {
        self.archive.pop_front()
    }

    // === Lifecycle ===

    /// Seat two players. Resumes their saved game if one exists.
    pub fn start_game(&mut self, players: [u64; 2]) -> Result<GameId, TableError> {
        if players[0] == players[1] {
            return Err(TableError::SamePlayer(players[0]));
        }
        if let Some(&seated) = players.iter().find(|&p| self.seated.contains_key(p)) {
            return Err(TableError::AlreadySeated(seated));
        }

        let game = match self.saved.get(players).cloned() {
            Some(record) => {
                let game = Self::resume_saved(record).inspect_err(|err| {
                    warn!(?players, %err, "saved game failed to resume, keeping it saved");
                })?;
                self.saved.take(players);
                game
            }
            None => Game::new(players, self.config.rules, Deal::shuffled(&mut self.rng.fork()))?,
        };

        let id = GameId(self.next_id);
        self.next_id += 1;
        info!(%id, players = ?game.record().players, resumed = !game.is_empty(), "table started");
        for &player in &game.record().players {
            self.seated.insert(player, id);
        }
        self.games.insert(id, game);
        Ok(id)
    }

    /// Play the `index`-th legal move for `player`.
    ///
    /// The outcome carries the winner and any claim failures. An invariant
    /// violation tears down this game only.
    pub fn submit(&mut self, id: GameId, player: u64, index: usize) -> Result<MoveOutcome, TableError> {
        let game = self.games.get_mut(&id).ok_or(TableError::UnknownGame(id))?;
        let seat = game
            .record()
            .seat_of(player)
            .ok_or(TableError::NotSeated { game: id, player })?;
        if game.position().turn().player != seat {
            warn!(%id, player, "move submitted out of turn");
            return Err(TableError::NotYourTurn { game: id, player });
        }

        match game.play_index(index) {
            Ok((_, outcome)) => Ok(outcome),
            Err(err) if err.is_fatal() => {
                error!(%id, %err, "invariant violation, tearing down game");
                self.remove(id);
                Err(TableError::TornDown { game: id, source: err })
            }
            Err(err) => {
                warn!(%id, player, %err, "move rejected");
                Err(TableError::Rejected(err))
            }
        }
    }

    /// Close a table. Ended games are archived, others saved for resume.
    pub fn finish_table(&mut self, id: GameId) -> Result<(), TableError> {
        let mut game = self.remove(id).ok_or(TableError::UnknownGame(id))?;
        if game.position().is_terminal() {
            info!(%id, winner = ?game.winner(), "table finished, archiving");
            self.archive.push_back(game.into_record());
        } else {
            if game.record().moves.back() != Some(&Move::Pause) {
                game.pause().map_err(TableError::Rejected)?;
            }
            info!(%id, moves = game.len(), "table closed unfinished, saving");
            self.saved.insert(game.into_record());
        }
        Ok(())
    }

    /// Close every table and hand back the saved games.
    #[must_use]
    pub fn shutdown(mut self) -> (SavedGames, Vec<GameRecord>) {
        let mut ids: Vec<GameId> = self.games.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            if let Err(err) = self.finish_table(id) {
                error!(%id, %err, "failed to close table at shutdown");
            }
        }
        info!(saved = self.saved.len(), archived = self.archive.len(), "tables shut down");
        (self.saved, self.archive.into_iter().collect())
    }

    /// Serve one request.
    pub fn handle(&mut self, request: TableRequest) -> Result<TableResponse, TableError> {
        match request {
            TableRequest::StartGame { players } => self.start_game(players).map(TableResponse::Started),
            TableRequest::LegalMoves { game } => self
                .game(game)
                .map(|g| TableResponse::LegalMoves(g.position().legal_moves()))
                .ok_or(TableError::UnknownGame(game)),
            TableRequest::Submit {
                game,
                player,
                index,
            } => self.submit(game, player, index).map(TableResponse::Moved),
            TableRequest::FinishTable { game } => self.finish_table(game).map(|()| TableResponse::Finished),
        }
    }

    fn resume_saved(record: GameRecord) -> Result<Game, TableError> {
        let mut game = Game::from_record(record)?;
        game.resume().map_err(|source| RecordError::Replay {
            index: game.len(),
            source,
        })?;
        Ok(game)
    }

    fn remove(&mut self, id: GameId) -> Option<Game> {
        let game = self.games.remove(&id)?;
        for player in game.record().players {
            self.seated.remove(&player);
        }
        Some(game)
    }
}
