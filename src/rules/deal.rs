//! The initial deal: both deck orders and the starting player.

use serde::{Deserialize, Serialize};

use crate::cards::{registry, CardIx, DeckKind};
use crate::core::{GameRng, InvariantViolation, PlayerId};
use crate::zones::LocationTable;

/// Deck orders (bottom to top) and the player who moves first.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deal {
    pub troops: Vec<CardIx>,
    pub tactics: Vec<CardIx>,
    /// The player who moves first.
    pub dealer: PlayerId,
}

impl Deal {
    /// Both decks in index order.
    #[must_use]
    pub fn ordered(dealer: PlayerId) -> Self {
        Self {
            troops: registry::deck_cards(DeckKind::Troop).collect(),
            tactics: registry::deck_cards(DeckKind::Tactic).collect(),
            dealer,
        }
    }

    /// Shuffle both decks and pick the dealer at random.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let dealer = if rng.coin_flip() {
            PlayerId::SECOND
        } else {
            PlayerId::FIRST
        };
        let mut deal = Self::ordered(dealer);
        rng.shuffle(&mut deal.troops);
        rng.shuffle(&mut deal.tactics);
        deal
    }

    /// A location table with both decks stacked as dealt.
    ///
    /// Fails unless each deck order is a permutation of that deck.
    pub fn table(&self) -> Result<LocationTable, InvariantViolation> {
        LocationTable::new(&self.troops, &self.tactics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::Zone;

    #[test]
    fn test_shuffle_is_deterministic() {
        let a = Deal::shuffled(&mut GameRng::new(7));
        let b = Deal::shuffled(&mut GameRng::new(7));
        let c = Deal::shuffled(&mut GameRng::new(8));

        assert_eq!(a, b);
        assert_ne!(a.troops, c.troops);
    }

    #[test]
    fn test_shuffled_deal_is_valid() {
        let deal = Deal::shuffled(&mut GameRng::new(42));
        let table = deal.table().unwrap();

        assert_eq!(table.top_card(Zone::TroopDeck), deal.troops.last().copied());
        assert!(table.verify().is_ok());
    }

    #[test]
    fn test_malformed_deal_rejected() {
        let mut deal = Deal::ordered(PlayerId::FIRST);
        deal.troops.pop();

        assert!(deal.table().is_err());
    }
}
