//! Turn state machine.
//!
//! A turn runs: claim flags (only when the player has candidates), play one
//! hand card, draw one card. Scouting replaces the draw with three draws
//! followed by returning two cards. `Finished` and `Quit` are terminal.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Draws still owed after Scout's first draw.
pub const SCOUT_EXTRA_DRAWS: u8 = 2;

/// Cards returned at the end of a scout.
pub const SCOUT_RETURNS: usize = 2;

/// Which move shape is legal next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    /// Choose which candidate flags to claim.
    SelectFlagClaim,
    /// Play a card from hand, or pass.
    PlayHandCard,
    /// Draw the end-of-turn card.
    SelectFromDeck,
    /// Scouting: draw `remaining` more cards.
    ScoutDraw { remaining: u8 },
    /// Scouting: return cards to deck bottoms.
    ReturnScoutedCards,
    /// A win condition holds.
    Finished { winner: PlayerId },
    /// A player gave up.
    Quit { loser: PlayerId },
}

impl TurnState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnState::Finished { .. } | TurnState::Quit { .. })
    }

    /// The winner of a terminal state.
    #[must_use]
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            TurnState::Finished { winner } => Some(winner),
            TurnState::Quit { loser } => Some(loser.opponent()),
            _ => None,
        }
    }
}

/// Whose turn it is and what they may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    /// The player to move.
    pub player: PlayerId,
    pub state: TurnState,
    /// Whether passing is allowed: set on entering `PlayHandCard` when the
    /// player has no hand move.
    pub can_pass: bool,
}

impl Turn {
    #[must_use]
    pub fn new(player: PlayerId, state: TurnState) -> Self {
        Self {
            player,
            state,
            can_pass: false,
        }
    }
}
