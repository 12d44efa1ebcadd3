//! Static card registry.
//!
//! The full card set is fixed, so the registry is a set of pure functions
//! rather than a populated map: card index to definition, and deck position
//! to card index and back. Every function is total over its domain and
//! returns `None` outside it.

use serde::{Deserialize, Serialize};

use super::card::{CardIx, CardKind, DeckKind, TACTIC_COUNT, TROOP_COUNT};

/// Display data for one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// The card.
    pub ix: CardIx,
    /// What it is.
    pub kind: CardKind,
    /// Human-readable name, e.g. "Red 7" or "Alexander".
    pub name: String,
}

/// Look up a card's definition.
///
/// ```
/// use battleline::cards::{registry, CardIx};
///
/// let card = CardIx::new(17).unwrap();
/// assert_eq!(registry::definition(card).name, "Orange 7");
/// ```
#[must_use]
pub fn definition(ix: CardIx) -> CardDefinition {
    let kind = ix.kind();
    let name = match kind {
        CardKind::Troop { color, value } => format!("{} {}", color.name(), value),
        CardKind::Tactic(tactic) => tactic.name().to_string(),
    };
    CardDefinition { ix, kind, name }
}

/// All cards dealt from the given deck, in index order.
pub fn deck_cards(deck: DeckKind) -> impl Iterator<Item = CardIx> {
    (0..deck.size()).filter_map(move |pos| from_deck_position(deck, pos))
}

/// The card at a zero-based position of a deck's index range.
#[must_use]
pub fn from_deck_position(deck: DeckKind, pos: usize) -> Option<CardIx> {
    let (base, size) = match deck {
        DeckKind::Troop => (1, TROOP_COUNT),
        DeckKind::Tactic => (TROOP_COUNT + 1, TACTIC_COUNT),
    };
    if pos < size {
        u8::try_from(base + pos).ok().and_then(CardIx::new)
    } else {
        None
    }
}

/// The zero-based position of a card within its deck's index range.
#[must_use]
pub fn deck_position(card: CardIx) -> usize {
    match card.deck() {
        DeckKind::Troop => card.offset(),
        DeckKind::Tactic => card.offset() - TROOP_COUNT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Tactic;

    #[test]
    fn test_definitions() {
        assert_eq!(definition(CardIx::new(1).unwrap()).name, "Red 1");
        assert_eq!(definition(CardIx::new(60).unwrap()).name, "Purple 10");
        assert_eq!(definition(CardIx::tactic(Tactic::Fog)).name, "Fog");
    }

    #[test]
    fn test_deck_positions() {
        assert_eq!(from_deck_position(DeckKind::Troop, 0), CardIx::new(1));
        assert_eq!(from_deck_position(DeckKind::Troop, 59), CardIx::new(60));
        assert_eq!(from_deck_position(DeckKind::Troop, 60), None);
        assert_eq!(from_deck_position(DeckKind::Tactic, 0), CardIx::new(61));
        assert_eq!(from_deck_position(DeckKind::Tactic, 10), None);

        for card in CardIx::all() {
            assert_eq!(from_deck_position(card.deck(), deck_position(card)), Some(card));
        }
    }

    #[test]
    fn test_deck_partition() {
        assert_eq!(deck_cards(DeckKind::Troop).count(), TROOP_COUNT);
        assert_eq!(deck_cards(DeckKind::Tactic).count(), TACTIC_COUNT);
        assert!(deck_cards(DeckKind::Troop).all(CardIx::is_troop));
        assert!(deck_cards(DeckKind::Tactic).all(|c| !c.is_troop()));
    }
}
