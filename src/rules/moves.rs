//! Moves and their reported side effects.
//!
//! `Move` is a closed sum type with one case per move shape. Callers pick a
//! move by index into `Position::legal_moves()`, or submit a value that must
//! be a member of that set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardIx, DeckKind};
use crate::core::{PlayerId, FLAG_COUNT};
use crate::flags::{Cascade, FlagId};

/// Flags named in one claim move.
pub type FlagSet = SmallVec<[FlagId; FLAG_COUNT]>;

/// Cards returned by one scout, per deck.
pub type Returned = SmallVec<[CardIx; 2]>;

/// A move.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Claim these flags (possibly none). Ascending order.
    Claim { flags: FlagSet },
    /// Draw the top card of a deck.
    Draw { deck: DeckKind },
    /// Return scouted cards to the bottoms of their decks.
    ReturnScouted { troops: Returned, tactics: Returned },
    /// Put a hand card on the mover's side of a flag.
    SetOnFlag { card: CardIx, flag: FlagId },
    /// Play Scout and make its first draw from `deck`.
    Scout { card: CardIx, deck: DeckKind },
    /// Dish an opposing card from a flag.
    Deserter {
        card: CardIx,
        flag: FlagId,
        target: CardIx,
    },
    /// Move an opposing troop onto the mover's side of another flag.
    Traitor {
        card: CardIx,
        source: FlagId,
        target: CardIx,
        dest: FlagId,
    },
    /// Move an own card to another flag, or to the dish when `dest` is `None`.
    Redeploy {
        card: CardIx,
        source: FlagId,
        target: CardIx,
        dest: Option<FlagId>,
    },
    /// End the turn without playing or drawing.
    Pass,
    /// Concede the game.
    GiveUp,
    /// History marker; does not change the position.
    Pause,
}

impl Move {
    /// The hand card this move plays, if any.
    #[must_use]
    pub fn played_card(&self) -> Option<CardIx> {
        match *self {
            Move::SetOnFlag { card, .. }
            | Move::Scout { card, .. }
            | Move::Deserter { card, .. }
            | Move::Traitor { card, .. }
            | Move::Redeploy { card, .. } => Some(card),
            _ => None,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Claim { flags } => {
                write!(f, "claim [")?;
                for (i, flag) in flags.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{flag}")?;
                }
                write!(f, "]")
            }
            Move::Draw { deck } => write!(f, "draw {deck}"),
            Move::ReturnScouted { troops, tactics } => {
                write!(f, "return {} troop and {} tactic cards", troops.len(), tactics.len())
            }
            Move::SetOnFlag { card, flag } => write!(f, "set {card} on flag {flag}"),
            Move::Scout { card, deck } => write!(f, "scout {card} from {deck} deck"),
            Move::Deserter { card, flag, target } => {
                write!(f, "deserter {card} dishes {target} from flag {flag}")
            }
            Move::Traitor {
                card,
                source,
                target,
                dest,
            } => write!(f, "traitor {card} moves {target} from flag {source} to flag {dest}"),
            Move::Redeploy {
                card,
                source,
                target,
                dest: Some(dest),
            } => write!(f, "redeploy {card} moves {target} from flag {source} to flag {dest}"),
            Move::Redeploy {
                card,
                source,
                target,
                dest: None,
            } => write!(f, "redeploy {card} dishes {target} from flag {source}"),
            Move::Pass => write!(f, "pass"),
            Move::GiveUp => write!(f, "give up"),
            Move::Pause => write!(f, "pause"),
        }
    }
}

/// Counter-evidence for failed claims: flag index (as a string) to the
/// cards that beat the claimant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimFailures(BTreeMap<String, Vec<CardIx>>);

impl ClaimFailures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed claim.
    pub fn insert(&mut self, flag: FlagId, evidence: &[CardIx]) {
        self.0.insert(flag.to_string(), evidence.to_vec());
    }

    /// The evidence recorded for a flag.
    #[must_use]
    pub fn get(&self, flag: FlagId) -> Option<&[CardIx]> {
        self.0.get(&flag.to_string()).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CardIx])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Side effects of applying one move.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The card drawn, if the move drew one.
    pub dealt: Option<CardIx>,
    /// Cards dished by a mud cascade.
    pub cascade: Cascade,
    /// Claims that were not granted.
    pub claim_failures: ClaimFailures,
    /// Flags claimed by this move.
    pub claimed: FlagSet,
    /// The winner, if this move ended the game.
    pub winner: Option<PlayerId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(id: u8) -> FlagId {
        FlagId::new(id).unwrap()
    }

    #[test]
    fn test_played_card() {
        let card = CardIx::new(12).unwrap();
        let set = Move::SetOnFlag { card, flag: flag(0) };

        assert_eq!(set.played_card(), Some(card));
        assert_eq!(Move::Pass.played_card(), None);
        assert_eq!(Move::Draw { deck: DeckKind::Troop }.played_card(), None);
    }

    #[test]
    fn test_claim_failures_keys() {
        let mut failures = ClaimFailures::new();
        let evidence = [CardIx::new(3).unwrap(), CardIx::new(4).unwrap()];
        failures.insert(flag(7), &evidence);
        failures.insert(flag(2), &[]);

        assert_eq!(failures.get(flag(7)), Some(&evidence[..]));
        let keys: Vec<_> = failures.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["2", "7"]);

        let json = serde_json::to_string(&failures).unwrap();
        assert_eq!(json, r#"{"2":[],"7":[3,4]}"#);
    }

    #[test]
    fn test_display() {
        let claim = Move::Claim {
            flags: SmallVec::from_slice(&[flag(1), flag(4)]),
        };
        assert_eq!(claim.to_string(), "claim [1, 4]");
        assert_eq!(Move::Draw { deck: DeckKind::Tactic }.to_string(), "draw tactic");
    }

    #[test]
    fn test_move_serde() {
        let mv = Move::Redeploy {
            card: CardIx::new(63).unwrap(),
            source: flag(3),
            target: CardIx::new(15).unwrap(),
            dest: None,
        };
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(serde_json::from_str::<Move>(&json).unwrap(), mv);
    }
}
