//! Card identity and kind.
//!
//! Every card has a stable `CardIx`. Troops occupy `1..=60`, tactics
//! `61..=70`. A card's kind is a pure function of its index; nothing about a
//! card is stored apart from where it lies (see `zones`).
//!
//! Troop layout: index `t` has color `(t - 1) / 10` and value
//! `(t - 1) % 10 + 1`, so `1` is the red 1 and `60` the purple 10.

use serde::{Deserialize, Serialize};

/// Number of troop cards.
pub const TROOP_COUNT: usize = 60;
/// Number of tactic cards.
pub const TACTIC_COUNT: usize = 10;
/// Total number of cards.
pub const CARD_COUNT: usize = TROOP_COUNT + TACTIC_COUNT;

/// Highest troop value.
pub const MAX_VALUE: u8 = 10;

/// Stable card identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardIx(u8);

impl CardIx {
    /// Create a card index, or `None` outside `1..=70`.
    #[must_use]
    pub const fn new(ix: u8) -> Option<Self> {
        if ix >= 1 && ix as usize <= CARD_COUNT {
            Some(Self(ix))
        } else {
            None
        }
    }

    /// The troop of the given color and value (1-10).
    #[must_use]
    pub const fn troop(color: Color, value: u8) -> Option<Self> {
        if value >= 1 && value <= MAX_VALUE {
            Some(Self(color as u8 * MAX_VALUE + value))
        } else {
            None
        }
    }

    /// The card carrying the given tactic.
    #[must_use]
    pub const fn tactic(tactic: Tactic) -> Self {
        Self(tactic as u8)
    }

    /// Get the raw index value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Zero-based position in a table of all cards.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.0 as usize - 1
    }

    /// Iterate over every card in index order.
    pub fn all() -> impl Iterator<Item = CardIx> {
        (1..=CARD_COUNT as u8).map(Self)
    }

    /// Is this a troop card?
    #[must_use]
    pub const fn is_troop(self) -> bool {
        self.0 as usize <= TROOP_COUNT
    }

    /// The deck this card is dealt from.
    #[must_use]
    pub const fn deck(self) -> DeckKind {
        if self.is_troop() {
            DeckKind::Troop
        } else {
            DeckKind::Tactic
        }
    }

    /// The card's kind.
    #[must_use]
    pub fn kind(self) -> CardKind {
        match self.tactic_of() {
            Some(tactic) => CardKind::Tactic(tactic),
            None => CardKind::Troop {
                color: Color::ALL[(self.0 as usize - 1) / MAX_VALUE as usize],
                value: (self.0 - 1) % MAX_VALUE + 1,
            },
        }
    }

    /// The tactic on this card, if it is a tactic card.
    #[must_use]
    pub fn tactic_of(self) -> Option<Tactic> {
        Tactic::ALL.iter().copied().find(|t| *t as u8 == self.0)
    }

    /// Does this card count toward a formation (troop or morale tactic)?
    #[must_use]
    pub fn is_formation_card(self) -> bool {
        match self.tactic_of() {
            None => true,
            Some(tactic) => tactic.class() == TacticClass::Morale,
        }
    }

    /// Is this Alexander or Darius?
    #[must_use]
    pub fn is_leader(self) -> bool {
        self.tactic_of().is_some_and(Tactic::is_leader)
    }
}

impl TryFrom<u8> for CardIx {
    type Error = String;

    fn try_from(ix: u8) -> Result<Self, Self::Error> {
        Self::new(ix).ok_or_else(|| format!("card index {ix} outside 1..={CARD_COUNT}"))
    }
}

impl From<CardIx> for u8 {
    fn from(card: CardIx) -> Self {
        card.0
    }
}

impl std::fmt::Display for CardIx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Troop colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Color {
    /// All colors in index order.
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Orange => "Orange",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Blue => "Blue",
            Color::Purple => "Purple",
        }
    }
}

/// Tactic cards. Discriminants are the card indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tactic {
    Traitor = 61,
    Deserter = 62,
    Redeploy = 63,
    Scout = 64,
    Mud = 65,
    Fog = 66,
    ShieldBearers = 67,
    CompanionCavalry = 68,
    Darius = 69,
    Alexander = 70,
}

impl Tactic {
    /// All tactics in index order.
    pub const ALL: [Tactic; TACTIC_COUNT] = [
        Tactic::Traitor,
        Tactic::Deserter,
        Tactic::Redeploy,
        Tactic::Scout,
        Tactic::Mud,
        Tactic::Fog,
        Tactic::ShieldBearers,
        Tactic::CompanionCavalry,
        Tactic::Darius,
        Tactic::Alexander,
    ];

    /// Which family this tactic belongs to.
    #[must_use]
    pub const fn class(self) -> TacticClass {
        match self {
            Tactic::Traitor | Tactic::Deserter | Tactic::Redeploy | Tactic::Scout => {
                TacticClass::Guile
            }
            Tactic::Mud | Tactic::Fog => TacticClass::Environment,
            Tactic::ShieldBearers
            | Tactic::CompanionCavalry
            | Tactic::Darius
            | Tactic::Alexander => TacticClass::Morale,
        }
    }

    /// Is this a leader?
    #[must_use]
    pub const fn is_leader(self) -> bool {
        matches!(self, Tactic::Darius | Tactic::Alexander)
    }

    /// Values a morale tactic may stand for. Empty for other tactics.
    #[must_use]
    pub const fn wild_values(self) -> &'static [u8] {
        match self {
            Tactic::Darius | Tactic::Alexander => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            Tactic::CompanionCavalry => &[8],
            Tactic::ShieldBearers => &[1, 2, 3],
            _ => &[],
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Tactic::Traitor => "Traitor",
            Tactic::Deserter => "Deserter",
            Tactic::Redeploy => "Redeploy",
            Tactic::Scout => "Scout",
            Tactic::Mud => "Mud",
            Tactic::Fog => "Fog",
            Tactic::ShieldBearers => "Shield Bearers",
            Tactic::CompanionCavalry => "Companion Cavalry",
            Tactic::Darius => "Darius",
            Tactic::Alexander => "Alexander",
        }
    }
}

/// Tactic families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TacticClass {
    /// Wild formation cards: leaders, Companion Cavalry, Shield Bearers.
    Morale,
    /// Flag modifiers: Fog, Mud.
    Environment,
    /// One-shot effects: Scout, Redeploy, Deserter, Traitor.
    Guile,
}

/// What a card is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Troop { color: Color, value: u8 },
    Tactic(Tactic),
}

/// The two draw decks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckKind {
    Troop,
    Tactic,
}

impl DeckKind {
    /// Both decks, troop first.
    pub const ALL: [DeckKind; 2] = [DeckKind::Troop, DeckKind::Tactic];

    /// Number of cards this deck starts with.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            DeckKind::Troop => TROOP_COUNT,
            DeckKind::Tactic => TACTIC_COUNT,
        }
    }
}

impl std::fmt::Display for DeckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckKind::Troop => write!(f, "troop"),
            DeckKind::Tactic => write!(f, "tactic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_range() {
        assert_eq!(CardIx::new(0), None);
        assert!(CardIx::new(1).is_some());
        assert!(CardIx::new(70).is_some());
        assert_eq!(CardIx::new(71), None);
        assert_eq!(CardIx::all().count(), CARD_COUNT);
    }

    #[test]
    fn test_troop_layout() {
        let red_one = CardIx::new(1).unwrap();
        assert_eq!(
            red_one.kind(),
            CardKind::Troop { color: Color::Red, value: 1 }
        );

        let purple_ten = CardIx::new(60).unwrap();
        assert_eq!(
            purple_ten.kind(),
            CardKind::Troop { color: Color::Purple, value: 10 }
        );

        assert_eq!(CardIx::troop(Color::Orange, 3), CardIx::new(13));
        assert_eq!(CardIx::troop(Color::Orange, 0), None);
        assert_eq!(CardIx::troop(Color::Orange, 11), None);
    }

    #[test]
    fn test_troop_roundtrip_over_all_troops() {
        for card in CardIx::all().filter(|c| c.is_troop()) {
            let CardKind::Troop { color, value } = card.kind() else {
                panic!("{card} should be a troop");
            };
            assert_eq!(CardIx::troop(color, value), Some(card));
        }
    }

    #[test]
    fn test_tactic_layout() {
        for tactic in Tactic::ALL {
            let card = CardIx::tactic(tactic);
            assert!(!card.is_troop());
            assert_eq!(card.deck(), DeckKind::Tactic);
            assert_eq!(card.kind(), CardKind::Tactic(tactic));
        }
        assert_eq!(CardIx::tactic(Tactic::Traitor).raw(), 61);
        assert_eq!(CardIx::tactic(Tactic::Alexander).raw(), 70);
    }

    #[test]
    fn test_formation_cards() {
        assert!(CardIx::new(5).unwrap().is_formation_card());
        assert!(CardIx::tactic(Tactic::Darius).is_formation_card());
        assert!(CardIx::tactic(Tactic::ShieldBearers).is_formation_card());
        assert!(!CardIx::tactic(Tactic::Mud).is_formation_card());
        assert!(!CardIx::tactic(Tactic::Scout).is_formation_card());
        assert!(CardIx::tactic(Tactic::Alexander).is_leader());
        assert!(!CardIx::tactic(Tactic::CompanionCavalry).is_leader());
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<CardIx>("0").is_err());
        assert!(serde_json::from_str::<CardIx>("71").is_err());
        assert_eq!(serde_json::from_str::<CardIx>("64").unwrap(), CardIx::tactic(Tactic::Scout));
    }
}
