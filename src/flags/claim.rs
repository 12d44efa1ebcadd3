//! Flag claim adjudication.
//!
//! A claim is granted only when the claimant's complete formation cannot be
//! beaten by anything the opponent could still assemble. Adjudication is a
//! pure query over borrowed card lists: it never touches the position and
//! yields the same verdict on the same input.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use super::formation::{evaluate, MAX_FORMATION};
use crate::cards::CardIx;

/// Counter-evidence: a formation that beats the claimant.
pub type Evidence = SmallVec<[CardIx; MAX_FORMATION]>;

/// Everything adjudication needs to know about one flag.
#[derive(Clone, Copy, Debug)]
pub struct ClaimQuery<'a> {
    /// The claimant's formation cards.
    pub claimant: &'a [CardIx],
    /// The opponent's formation cards.
    pub opponent: &'a [CardIx],
    /// Formation size on this flag.
    pub capacity: usize,
    /// Whether Fog lies on this flag.
    pub fog: bool,
    /// Whether the claimant completed before the opponent.
    pub claimant_first: bool,
    /// Cards the opponent may still bring to this flag.
    pub unseen: &'a [CardIx],
    /// Whether the opponent may still play a leader.
    pub leaders_allowed: bool,
}

/// Outcome of adjudicating one flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimVerdict {
    /// The claimant's formation is unbeatable.
    Claimable,
    /// The claimant has no complete formation.
    Incomplete,
    /// The opponent has or can reach a formation that wins.
    Beatable { evidence: Evidence },
}

impl ClaimVerdict {
    /// Whether the claim is granted.
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        matches!(self, ClaimVerdict::Claimable)
    }

    /// The counter-evidence, empty unless the claim is beatable.
    #[must_use]
    pub fn evidence(&self) -> &[CardIx] {
        match self {
            ClaimVerdict::Beatable { evidence } => evidence,
            _ => &[],
        }
    }
}

/// Decide whether a claim holds.
#[must_use]
pub fn adjudicate(query: &ClaimQuery<'_>) -> ClaimVerdict {
    if query.claimant.len() < query.capacity {
        return ClaimVerdict::Incomplete;
    }
    let target = evaluate(query.claimant, query.fog);

    if query.opponent.len() >= query.capacity {
        let defender = evaluate(query.opponent, query.fog);
        trace!(%target, %defender, claimant_first = query.claimant_first, "both sides complete");
        return if target > defender || (target == defender && query.claimant_first) {
            ClaimVerdict::Claimable
        } else {
            ClaimVerdict::Beatable {
                evidence: query.opponent.iter().copied().collect(),
            }
        };
    }

    let need = query.capacity - query.opponent.len();
    let mut pool: SmallVec<[CardIx; 64]> = query
        .unseen
        .iter()
        .copied()
        .filter(|c| c.is_formation_card() && (query.leaders_allowed || !c.is_leader()))
        .collect();
    pool.sort_unstable();

    if pool.len() < need {
        trace!(need, unseen = pool.len(), "too few unseen cards to complete");
        return ClaimVerdict::Claimable;
    }

    let mut buffer: Evidence = query.opponent.iter().copied().collect();
    for combo in pool.iter().copied().combinations(need) {
        if combo.iter().filter(|c| c.is_leader()).count() > 1 {
            continue;
        }
        buffer.truncate(query.opponent.len());
        buffer.extend(combo);
        let reach = evaluate(&buffer, query.fog);
        if reach > target {
            trace!(%target, %reach, "opponent can still win the flag");
            return ClaimVerdict::Beatable { evidence: buffer };
        }
    }

    trace!(%target, "no reachable formation beats the claim");
    ClaimVerdict::Claimable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Color, Tactic};
    use crate::flags::formation::FormationKind;

    fn troop(color: Color, value: u8) -> CardIx {
        CardIx::troop(color, value).unwrap()
    }

    fn query<'a>(claimant: &'a [CardIx], opponent: &'a [CardIx], unseen: &'a [CardIx]) -> ClaimQuery<'a> {
        ClaimQuery {
            claimant,
            opponent,
            capacity: 3,
            fog: false,
            claimant_first: true,
            unseen,
            leaders_allowed: true,
        }
    }

    #[test]
    fn test_incomplete_claimant() {
        let claimant = [troop(Color::Red, 1), troop(Color::Red, 2)];
        assert_eq!(adjudicate(&query(&claimant, &[], &[])), ClaimVerdict::Incomplete);
    }

    #[test]
    fn test_nothing_unseen_wins() {
        let claimant = [troop(Color::Red, 1), troop(Color::Blue, 5), troop(Color::Green, 9)];
        let verdict = adjudicate(&query(&claimant, &[], &[]));
        assert!(verdict.is_claimable());
        assert!(verdict.evidence().is_empty());
    }

    #[test]
    fn test_complete_opponent_compared() {
        let claimant = [troop(Color::Red, 7), troop(Color::Blue, 7), troop(Color::Green, 7)];
        let weaker = [troop(Color::Red, 1), troop(Color::Blue, 5), troop(Color::Green, 9)];
        let stronger = [troop(Color::Yellow, 1), troop(Color::Yellow, 2), troop(Color::Yellow, 3)];

        assert!(adjudicate(&query(&claimant, &weaker, &[])).is_claimable());

        let verdict = adjudicate(&query(&claimant, &stronger, &[]));
        assert_eq!(verdict.evidence(), &stronger);
    }

    #[test]
    fn test_tie_goes_to_first_complete() {
        let claimant = [troop(Color::Red, 7), troop(Color::Blue, 7), troop(Color::Green, 7)];
        let mirror = [troop(Color::Yellow, 7), troop(Color::Orange, 7), troop(Color::Purple, 7)];

        let mut q = query(&claimant, &mirror, &[]);
        assert!(adjudicate(&q).is_claimable());

        q.claimant_first = false;
        assert!(!adjudicate(&q).is_claimable());
    }

    #[test]
    fn test_incomplete_opponent_first_beating_subset() {
        let claimant = [troop(Color::Red, 1), troop(Color::Blue, 1), troop(Color::Green, 1)];
        let opponent = [troop(Color::Yellow, 5)];
        let unseen = [troop(Color::Yellow, 6), troop(Color::Purple, 9), troop(Color::Yellow, 7)];

        let verdict = adjudicate(&query(&claimant, &opponent, &unseen));
        let evidence = verdict.evidence();

        assert_eq!(evidence, &[opponent[0], unseen[0], unseen[2]]);
        assert!(evaluate(evidence, false) > evaluate(&claimant, false));
    }

    #[test]
    fn test_opponent_tie_is_not_enough() {
        // Orange 6 only ties the skirmish line.
        let claimant = [troop(Color::Red, 4), troop(Color::Blue, 5), troop(Color::Green, 6)];
        let opponent = [troop(Color::Yellow, 4), troop(Color::Purple, 5)];
        let unseen = [troop(Color::Orange, 6), troop(Color::Orange, 1)];

        assert!(adjudicate(&query(&claimant, &opponent, &unseen)).is_claimable());
    }

    #[test]
    fn test_too_few_unseen() {
        let claimant = [troop(Color::Red, 1), troop(Color::Blue, 2), troop(Color::Green, 9)];
        let unseen = [troop(Color::Yellow, 10), troop(Color::Yellow, 9)];

        assert!(adjudicate(&query(&claimant, &[], &unseen)).is_claimable());
    }

    #[test]
    fn test_leader_rules() {
        let claimant = [troop(Color::Red, 8), troop(Color::Red, 9), troop(Color::Red, 10)];
        let weak = [troop(Color::Red, 1), troop(Color::Red, 2), troop(Color::Red, 3)];
        let opponent = [troop(Color::Blue, 9)];
        let unseen = [CardIx::tactic(Tactic::Alexander), CardIx::tactic(Tactic::Darius)];

        // Two leaders never stand in one formation.
        assert!(adjudicate(&query(&weak, &opponent, &unseen)).is_claimable());

        let blue = [troop(Color::Blue, 10)];
        let mut all: Vec<CardIx> = unseen.to_vec();
        all.extend(blue);
        let q = query(&weak, &opponent, &all);
        let verdict = adjudicate(&q);
        assert_eq!(
            evaluate(verdict.evidence(), false).kind,
            FormationKind::Wedge
        );

        let q = ClaimQuery { leaders_allowed: false, ..q };
        assert!(adjudicate(&q).is_claimable());

        assert!(adjudicate(&query(&claimant, &opponent, &all)).is_claimable());
    }

    #[test]
    fn test_non_formation_unseen_ignored() {
        let claimant = [troop(Color::Red, 1), troop(Color::Blue, 2), troop(Color::Green, 9)];
        let unseen = [
            CardIx::tactic(Tactic::Mud),
            CardIx::tactic(Tactic::Fog),
            CardIx::tactic(Tactic::Scout),
        ];

        assert!(adjudicate(&query(&claimant, &[], &unseen)).is_claimable());
    }

    #[test]
    fn test_adjudication_is_repeatable() {
        let claimant = [troop(Color::Red, 2), troop(Color::Blue, 2), troop(Color::Green, 3)];
        let unseen: Vec<CardIx> = CardIx::all().filter(|c| c.is_troop()).skip(30).collect();
        let q = query(&claimant, &[], &unseen);

        assert_eq!(adjudicate(&q), adjudicate(&q));
    }
}
