//! Location table: where every card lies.
//!
//! The `LocationTable` is the authoritative map from card to zone. It keeps
//! two views in lockstep:
//! - `locations`: card offset -> zone
//! - `zone_order`: zone index -> ordered card list (last = top)
//!
//! Every higher-level operation (deal, draw, play, dish, flag placement and
//! removal, scout return) is a `relocate`, so card conservation holds by
//! construction: a relocation moves one card out of exactly one list and
//! into exactly one other.

use serde::{Deserialize, Serialize};

use crate::cards::{CardIx, DeckKind, CARD_COUNT};
use crate::core::{InvariantViolation, PlayerId, FLAG_COUNT, PLAYER_COUNT};
use crate::flags::FlagId;

/// Number of distinct zones.
pub const ZONE_COUNT: usize = 6 + FLAG_COUNT * PLAYER_COUNT;

/// Where a card can be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// The undealt troop deck.
    TroopDeck,
    /// The undealt tactic deck.
    TacticDeck,
    /// A player's hand.
    Hand(PlayerId),
    /// A player's discard pile.
    Dish(PlayerId),
    /// A player's side of a flag.
    Slot(FlagId, PlayerId),
}

impl Zone {
    /// The deck zone of a deck kind.
    #[must_use]
    pub const fn deck(kind: DeckKind) -> Self {
        match kind {
            DeckKind::Troop => Zone::TroopDeck,
            DeckKind::Tactic => Zone::TacticDeck,
        }
    }

    /// Dense zone number in `0..ZONE_COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Zone::TroopDeck => 0,
            Zone::TacticDeck => 1,
            Zone::Hand(p) => 2 + p.index(),
            Zone::Dish(p) => 4 + p.index(),
            Zone::Slot(flag, p) => 6 + flag.index() * PLAYER_COUNT + p.index(),
        }
    }

    /// Iterate over every zone in index order.
    pub fn all() -> impl Iterator<Item = Zone> {
        let fixed = [Zone::TroopDeck, Zone::TacticDeck]
            .into_iter()
            .chain(PlayerId::both().map(Zone::Hand))
            .chain(PlayerId::both().map(Zone::Dish));
        let slots = FlagId::all().flat_map(|flag| PlayerId::both().map(move |p| Zone::Slot(flag, p)));
        fixed.chain(slots)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::TroopDeck => write!(f, "troop deck"),
            Zone::TacticDeck => write!(f, "tactic deck"),
            Zone::Hand(p) => write!(f, "hand of {p}"),
            Zone::Dish(p) => write!(f, "dish of {p}"),
            Zone::Slot(flag, p) => write!(f, "flag {} side of {p}", flag.index()),
        }
    }
}

/// Where a relocated card lands within its new zone's order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Last in order (top of a deck).
    Top,
    /// First in order (bottom of a deck).
    Bottom,
}

/// Card locations across all zones.
///
/// ## Usage
///
/// ```
/// use battleline::cards::{registry, CardIx, DeckKind};
/// use battleline::core::PlayerId;
/// use battleline::zones::{LocationTable, Zone};
///
/// let troops: Vec<CardIx> = registry::deck_cards(DeckKind::Troop).collect();
/// let tactics: Vec<CardIx> = registry::deck_cards(DeckKind::Tactic).collect();
/// let mut table = LocationTable::new(&troops, &tactics).unwrap();
///
/// let card = table.deal_top(DeckKind::Troop, Zone::Hand(PlayerId::FIRST)).unwrap();
/// assert_eq!(card, CardIx::new(60).unwrap());
/// assert_eq!(table.zone_of(card), Zone::Hand(PlayerId::FIRST));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationTable {
    /// Card locations: card offset -> zone.
    locations: Vec<Zone>,

    /// Ordered card lists: zone index -> cards, last = top.
    zone_order: Vec<Vec<CardIx>>,
}

impl LocationTable {
    /// Create a table with every card in its deck, in the given orders.
    ///
    /// `troops` and `tactics` list each deck bottom to top and must each be a
    /// permutation of that deck's cards.
    pub fn new(troops: &[CardIx], tactics: &[CardIx]) -> Result<Self, InvariantViolation> {
        Self::from_zones([
            (Zone::TroopDeck, troops.to_vec()),
            (Zone::TacticDeck, tactics.to_vec()),
        ])
    }

    /// Create a table from explicit zone contents.
    ///
    /// Fails unless every card is listed exactly once. Decks may only hold
    /// their own cards.
    pub fn from_zones(
        zones: impl IntoIterator<Item = (Zone, Vec<CardIx>)>,
    ) -> Result<Self, InvariantViolation> {
        let mut zone_order = vec![Vec::new(); ZONE_COUNT];
        for (zone, cards) in zones {
            zone_order[zone.index()].extend(cards);
        }

        let mut locations: Vec<Option<Zone>> = vec![None; CARD_COUNT];
        for zone in Zone::all() {
            for &card in &zone_order[zone.index()] {
                let slot = &mut locations[card.offset()];
                if let Some(previous) = slot {
                    return Err(InvariantViolation::Conservation(format!(
                        "card {card} listed in both {previous} and {zone}"
                    )));
                }
                if matches!(zone, Zone::TroopDeck | Zone::TacticDeck) && Zone::deck(card.deck()) != zone {
                    return Err(InvariantViolation::Conservation(format!(
                        "card {card} cannot lie in the {zone}"
                    )));
                }
                *slot = Some(zone);
            }
        }

        let locations = locations
            .into_iter()
            .zip(CardIx::all())
            .map(|(zone, card)| {
                zone.ok_or_else(|| InvariantViolation::Conservation(format!("card {card} has no zone")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            locations,
            zone_order,
        })
    }

    /// Get the zone a card is in.
    #[must_use]
    pub fn zone_of(&self, card: CardIx) -> Zone {
        self.locations[card.offset()]
    }

    /// Check if a card is in a specific zone.
    #[must_use]
    pub fn is_in_zone(&self, card: CardIx, zone: Zone) -> bool {
        self.zone_of(card) == zone
    }

    /// Cards in a zone, in order (last = top).
    #[must_use]
    pub fn cards(&self, zone: Zone) -> &[CardIx] {
        &self.zone_order[zone.index()]
    }

    /// Number of cards in a zone.
    #[must_use]
    pub fn zone_size(&self, zone: Zone) -> usize {
        self.zone_order[zone.index()].len()
    }

    /// Top card of a zone (last in order).
    #[must_use]
    pub fn top_card(&self, zone: Zone) -> Option<CardIx> {
        self.zone_order[zone.index()].last().copied()
    }

    /// Move a card from `from` to `to`.
    ///
    /// Fails, leaving the table untouched, if the card is not in `from`.
    pub fn relocate(
        &mut self,
        card: CardIx,
        from: Zone,
        to: Zone,
        position: ZonePosition,
    ) -> Result<(), InvariantViolation> {
        let actual = self.zone_of(card);
        if actual != from {
            return Err(InvariantViolation::Misplaced {
                card,
                expected: from,
                actual,
            });
        }

        let source = &mut self.zone_order[from.index()];
        let Some(at) = source.iter().position(|&c| c == card) else {
            return Err(InvariantViolation::Conservation(format!(
                "card {card} mapped to {from} but missing from its list"
            )));
        };
        source.remove(at);

        let target = &mut self.zone_order[to.index()];
        match position {
            ZonePosition::Top => target.push(card),
            ZonePosition::Bottom => target.insert(0, card),
        }
        self.locations[card.offset()] = to;

        Ok(())
    }

    /// Move the top card of a deck to `to`.
    ///
    /// Dealing from an empty deck is a precondition violation: callers check
    /// the deck size first.
    pub fn deal_top(&mut self, deck: DeckKind, to: Zone) -> Result<CardIx, InvariantViolation> {
        let zone = Zone::deck(deck);
        let card = self.top_card(zone).ok_or(InvariantViolation::EmptyDeck(deck))?;
        self.relocate(card, zone, to, ZonePosition::Top)?;
        Ok(card)
    }

    /// Recheck card conservation from scratch.
    ///
    /// Every card must appear in exactly one list, and that list must be the
    /// zone the location map names.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        if self.locations.len() != CARD_COUNT || self.zone_order.len() != ZONE_COUNT {
            return Err(InvariantViolation::Conservation("table has the wrong shape".to_string()));
        }

        let mut seen = [false; CARD_COUNT];
        for zone in Zone::all() {
            for &card in self.cards(zone) {
                if std::mem::replace(&mut seen[card.offset()], true) {
                    return Err(InvariantViolation::Conservation(format!(
                        "card {card} listed twice"
                    )));
                }
                let mapped = self.zone_of(card);
                if mapped != zone {
                    return Err(InvariantViolation::Misplaced {
                        card,
                        expected: mapped,
                        actual: zone,
                    });
                }
            }
        }

        match CardIx::all().find(|card| !seen[card.offset()]) {
            Some(card) => Err(InvariantViolation::Conservation(format!(
                "card {card} is in no list"
            ))),
            None => Ok(()),
        }
    }
}
