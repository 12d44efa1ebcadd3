//! Claim adjudication scenarios on built positions.

use battleline::cards::{CardIx, Color, Tactic};
use battleline::core::{GameConfig, PlayerId};
use battleline::flags::{evaluate, ClaimVerdict, FlagId};
use battleline::rules::{Move, PositionBuilder, TurnState};
use battleline::zones::Zone;
use smallvec::SmallVec;

const A: PlayerId = PlayerId::FIRST;
const B: PlayerId = PlayerId::SECOND;

fn troop(color: Color, value: u8) -> CardIx {
    CardIx::troop(color, value).unwrap()
}

fn flag(id: u8) -> FlagId {
    FlagId::new(id).unwrap()
}

fn claim(flags: &[FlagId]) -> Move {
    Move::Claim {
        flags: SmallVec::from_slice(flags),
    }
}

// =============================================================================
// Exhausted Supply
// =============================================================================

/// A wedge against an empty hand and empty decks is claimable.
#[test]
fn test_wedge_with_nothing_unseen_claims() {
    let mut position = PositionBuilder::new(GameConfig::default())
        .slot(flag(0), A, &[troop(Color::Green, 8), troop(Color::Green, 9), troop(Color::Green, 10)])
        .rest_to(Zone::Dish(A))
        .build()
        .unwrap();

    assert_eq!(position.turn().state, TurnState::SelectFlagClaim);
    let outcome = position.apply(&claim(&[flag(0)])).unwrap();

    assert_eq!(outcome.claimed.as_slice(), &[flag(0)]);
    assert!(outcome.claim_failures.is_empty());
    assert_eq!(position.flag(flag(0)).owner(), Some(A));
}

/// Even a weak host claims when the opponent cannot complete at all.
#[test]
fn test_host_claims_when_opponent_cannot_complete() {
    let position = PositionBuilder::new(GameConfig::default())
        .slot(flag(6), A, &[troop(Color::Red, 1), troop(Color::Blue, 2), troop(Color::Green, 4)])
        .slot(flag(6), B, &[troop(Color::Yellow, 10)])
        .hand(B, &[troop(Color::Yellow, 9)])
        .rest_to(Zone::Dish(A))
        .build()
        .unwrap();

    assert_eq!(position.adjudicate(flag(6), A), ClaimVerdict::Claimable);
}

// =============================================================================
// Counter-Evidence
// =============================================================================

/// A low formation fails, and the evidence is itself a stronger formation.
#[test]
fn test_low_claim_fails_with_stronger_evidence() {
    let mine = [troop(Color::Red, 1), troop(Color::Blue, 2), troop(Color::Green, 4)];
    let theirs = troop(Color::Yellow, 9);
    let mut position = PositionBuilder::new(GameConfig::default())
        .slot(flag(3), A, &mine)
        .slot(flag(3), B, &[theirs])
        .build()
        .unwrap();

    let outcome = position.apply(&claim(&[flag(3)])).unwrap();

    assert!(outcome.claimed.is_empty());
    let evidence = outcome.claim_failures.get(flag(3)).unwrap();
    assert_eq!(evidence.len(), 3);
    assert_eq!(evidence[0], theirs);
    assert!(evaluate(evidence, false) > evaluate(&mine, false));
    assert!(!position.flag(flag(3)).is_claimed());
}

/// Against a complete, stronger opponent the evidence is their formation.
#[test]
fn test_complete_opponent_is_the_evidence() {
    let theirs = [troop(Color::Purple, 4), troop(Color::Purple, 5), troop(Color::Purple, 6)];
    let position = PositionBuilder::new(GameConfig::default())
        .slot(flag(1), A, &[troop(Color::Red, 10), troop(Color::Blue, 10), troop(Color::Green, 10)])
        .slot(flag(1), B, &theirs)
        .build()
        .unwrap();

    assert_eq!(position.adjudicate(flag(1), A).evidence(), &theirs);
    assert!(position.adjudicate(flag(1), B).is_claimable());
}

/// Equal formations go to the side that completed first.
#[test]
fn test_tie_goes_to_first_completed() {
    let sevens_a = [troop(Color::Red, 7), troop(Color::Blue, 7), troop(Color::Green, 7)];
    let sevens_b = [troop(Color::Yellow, 7), troop(Color::Orange, 7), troop(Color::Purple, 7)];

    let a_first = PositionBuilder::new(GameConfig::default())
        .slot(flag(2), A, &sevens_a)
        .slot(flag(2), B, &sevens_b)
        .build()
        .unwrap();
    assert!(a_first.adjudicate(flag(2), A).is_claimable());
    assert!(!a_first.adjudicate(flag(2), B).is_claimable());

    let b_first = PositionBuilder::new(GameConfig::default())
        .slot(flag(2), B, &sevens_b)
        .slot(flag(2), A, &sevens_a)
        .build()
        .unwrap();
    assert!(!b_first.adjudicate(flag(2), A).is_claimable());
    assert!(b_first.adjudicate(flag(2), B).is_claimable());
}

/// Fog reduces both sides to their sums.
#[test]
fn test_fog_compares_sums() {
    let wedge = [troop(Color::Red, 1), troop(Color::Red, 2), troop(Color::Red, 3)];
    let host = [troop(Color::Blue, 10), troop(Color::Green, 9), troop(Color::Yellow, 8)];

    let clear = PositionBuilder::new(GameConfig::default())
        .slot(flag(4), A, &wedge)
        .slot(flag(4), B, &host)
        .build()
        .unwrap();
    assert!(clear.adjudicate(flag(4), A).is_claimable());

    let mut fogged_side = host.to_vec();
    fogged_side.push(CardIx::tactic(Tactic::Fog));
    let fogged = PositionBuilder::new(GameConfig::default())
        .slot(flag(4), A, &wedge)
        .slot(flag(4), B, &fogged_side)
        .build()
        .unwrap();
    assert_eq!(fogged.adjudicate(flag(4), A).evidence(), &host);
}

// =============================================================================
// Leaders
// =============================================================================

/// A leader in the unseen set can complete the opponent's wedge, unless the
/// opponent has already played their leader.
#[test]
fn test_leader_counts_only_while_unplayed() {
    let phalanx = [troop(Color::Red, 5), troop(Color::Blue, 5), troop(Color::Green, 5)];
    let pair = [troop(Color::Purple, 10), troop(Color::Purple, 9)];
    let spent = [troop(Color::Purple, 8), CardIx::tactic(Tactic::CompanionCavalry)];

    let open = PositionBuilder::new(GameConfig::default())
        .slot(flag(0), A, &phalanx)
        .slot(flag(0), B, &pair)
        .dish(A, &spent)
        .build()
        .unwrap();
    let verdict = open.adjudicate(flag(0), A);
    let evidence = verdict.evidence();
    assert_eq!(evidence.len(), 3);
    assert!(evidence.iter().any(|c| c.is_leader()));

    let darius_played = PositionBuilder::new(GameConfig::default())
        .slot(flag(0), A, &phalanx)
        .slot(flag(0), B, &pair)
        .slot(flag(5), B, &[CardIx::tactic(Tactic::Darius)])
        .dish(A, &spent)
        .build()
        .unwrap();
    assert!(darius_played.adjudicate(flag(0), A).is_claimable());
}

/// Adjudication does not change the position.
#[test]
fn test_adjudication_is_a_query() {
    let position = PositionBuilder::new(GameConfig::default())
        .slot(flag(8), A, &[troop(Color::Red, 6), troop(Color::Red, 7), troop(Color::Blue, 8)])
        .build()
        .unwrap();
    let before = position.clone();

    let first = position.adjudicate(flag(8), A);
    let second = position.adjudicate(flag(8), A);

    assert_eq!(first, second);
    assert_eq!(position, before);
}

// =============================================================================
// Claim Moves
// =============================================================================

/// Claims run in flag order and a failure does not stop the rest.
#[test]
fn test_mixed_claim_reports_each_flag() {
    let mut position = PositionBuilder::new(GameConfig::default())
        .slot(flag(1), A, &[troop(Color::Red, 1), troop(Color::Blue, 2), troop(Color::Green, 4)])
        .slot(flag(7), A, &[troop(Color::Yellow, 8), troop(Color::Yellow, 9), troop(Color::Yellow, 10)])
        .build()
        .unwrap();

    let outcome = position.apply(&claim(&[flag(1), flag(7)])).unwrap();

    assert_eq!(outcome.claimed.as_slice(), &[flag(7)]);
    assert!(outcome.claim_failures.get(flag(1)).is_some());
    assert_eq!(outcome.winner, None);
    assert_eq!(position.turn().state, TurnState::PlayHandCard);
}

/// Claiming a flag that is not a candidate is rejected outright.
#[test]
fn test_claim_outside_candidates_rejected() {
    let mut position = PositionBuilder::new(GameConfig::default())
        .slot(flag(1), A, &[troop(Color::Yellow, 8), troop(Color::Yellow, 9), troop(Color::Yellow, 10)])
        .build()
        .unwrap();
    let before = position.clone();

    assert!(position.apply(&claim(&[flag(2)])).is_err());
    assert_eq!(position, before);
}

/// The fifth claimed flag wins by envelopment.
#[test]
fn test_envelopment_by_claim() {
    let mut builder = PositionBuilder::new(GameConfig::default());
    for f in [0, 2, 4, 6] {
        builder = builder.claimed(flag(f), A);
    }
    let mut position = builder
        .slot(flag(8), A, &[troop(Color::Yellow, 8), troop(Color::Yellow, 9), troop(Color::Yellow, 10)])
        .build()
        .unwrap();

    let outcome = position.apply(&claim(&[flag(8)])).unwrap();

    assert_eq!(outcome.winner, Some(A));
    assert_eq!(position.turn().state, TurnState::Finished { winner: A });
    assert!(position.legal_moves().is_empty());
}
