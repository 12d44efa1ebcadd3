//! The position: aggregate root of one game.
//!
//! `Position` owns the location table, the nine flags, and the turn. It
//! changes only through `apply`, which validates the move against the
//! current legal set before touching anything.
//!
//! ## Move ordering
//!
//! `legal_moves()` is deterministic: claim subsets in `powerset` order, hand
//! moves in hand order (then flag, target, destination ascending), draws
//! troop before tactic, and `GiveUp` last.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::deal::Deal;
use super::moves::{ClaimFailures, FlagSet, Move, MoveOutcome, Returned};
use super::turn::{Turn, TurnState, SCOUT_EXTRA_DRAWS, SCOUT_RETURNS};
use crate::cards::{CardIx, DeckKind, Tactic, TacticClass};
use crate::core::{
    EngineResult, GameConfig, InvalidMove, InvariantViolation, PlayerId, FLAG_COUNT,
};
use crate::flags::{ClaimVerdict, Flag, FlagId};
use crate::zones::{LocationTable, Zone, ZonePosition};

/// The complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    table: LocationTable,
    flags: Vec<Flag>,
    turn: Turn,
    config: GameConfig,
}

impl Position {
    /// Deal the opening hands and start the dealer's turn.
    ///
    /// Each hand receives `hand_size` troops from the top of the troop
    /// deck, seat 0 first.
    pub fn from_deal(deal: &Deal, config: GameConfig) -> Result<Self, InvariantViolation> {
        let mut table = deal.table()?;
        for player in PlayerId::both() {
            for _ in 0..config.hand_size {
                table.deal_top(DeckKind::Troop, Zone::Hand(player))?;
            }
        }

        let mut position = Self {
            table,
            flags: FlagId::all().map(Flag::new).collect(),
            turn: Turn::new(deal.dealer, TurnState::PlayHandCard),
            config,
        };
        position.start_turn(deal.dealer);
        Ok(position)
    }

    // === Accessors ===

    #[must_use]
    pub fn table(&self) -> &LocationTable {
        &self.table
    }

    #[must_use]
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    #[must_use]
    pub fn flag(&self, id: FlagId) -> &Flag {
        &self.flags[id.index()]
    }

    #[must_use]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// A player's hand, in insertion order.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[CardIx] {
        self.table.cards(Zone::Hand(player))
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.turn.state.is_terminal()
    }

    /// The winner, once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.turn.state.winner()
    }

    /// Recheck card conservation.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.table.verify()
    }

    // === Derived queries ===

    /// Decks the player to move may draw from.
    #[must_use]
    pub fn drawable_decks(&self) -> SmallVec<[DeckKind; 2]> {
        DeckKind::ALL
            .into_iter()
            .filter(|&deck| deck == DeckKind::Troop || self.config.tactics)
            .filter(|&deck| self.table.zone_size(Zone::deck(deck)) > 0)
            .collect()
    }

    /// Unclaimed flags where `player`'s formation is complete.
    #[must_use]
    pub fn claim_candidates(&self, player: PlayerId) -> FlagSet {
        self.flags
            .iter()
            .filter(|f| !f.is_claimed() && f.is_complete(&self.table, player))
            .map(Flag::id)
            .collect()
    }

    /// Tactic cards `player` has played: on their flag sides or in their dish.
    #[must_use]
    pub fn tactics_played(&self, player: PlayerId) -> usize {
        Tactic::ALL
            .into_iter()
            .filter(|&t| self.played_by(CardIx::tactic(t), player))
            .count()
    }

    /// Whether `player` has played a leader.
    #[must_use]
    pub fn leader_played(&self, player: PlayerId) -> bool {
        [Tactic::Alexander, Tactic::Darius]
            .into_iter()
            .any(|t| self.played_by(CardIx::tactic(t), player))
    }

    fn played_by(&self, card: CardIx, player: PlayerId) -> bool {
        match self.table.zone_of(card) {
            Zone::Slot(_, p) | Zone::Dish(p) => p == player,
            _ => false,
        }
    }

    /// Whether `player` may play a tactic card now.
    #[must_use]
    pub fn may_play_tactic(&self, player: PlayerId) -> bool {
        self.tactics_played(player) <= self.tactics_played(player.opponent())
    }

    /// Cards the opponent of `claimant` may still bring to a flag.
    #[must_use]
    pub fn unseen_for(&self, claimant: PlayerId) -> Vec<CardIx> {
        let mut unseen: Vec<CardIx> = self.hand(claimant.opponent()).to_vec();
        unseen.extend_from_slice(self.table.cards(Zone::TroopDeck));
        if self.config.tactics {
            unseen.extend_from_slice(self.table.cards(Zone::TacticDeck));
        }
        unseen
    }

    /// Adjudicate a claim on `flag` by `claimant` without changing anything.
    #[must_use]
    pub fn adjudicate(&self, flag: FlagId, claimant: PlayerId) -> ClaimVerdict {
        let leaders_allowed = !self.leader_played(claimant.opponent());
        self.flag(flag)
            .adjudicate(&self.table, claimant, &self.unseen_for(claimant), leaders_allowed)
    }

    /// The winner by claimed flags, if either win condition holds.
    #[must_use]
    pub fn flag_winner(&self) -> Option<PlayerId> {
        PlayerId::both().find(|&p| self.holds_win(p))
    }

    fn holds_win(&self, player: PlayerId) -> bool {
        let owned: SmallVec<[bool; FLAG_COUNT]> =
            self.flags.iter().map(|f| f.owner() == Some(player)).collect();
        let total = owned.iter().filter(|&&o| o).count();
        let longest_run = owned
            .iter()
            .fold((0usize, 0usize), |(run, best), &o| {
                let run = if o { run + 1 } else { 0 };
                (run, best.max(run))
            })
            .1;
        total >= self.config.envelopment || longest_run >= self.config.breakthrough
    }

    // === Legal moves ===

    /// Every legal move in the current state.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let player = self.turn.player;
        let mut moves = match self.turn.state {
            TurnState::Finished { .. } | TurnState::Quit { .. } => return Vec::new(),
            TurnState::SelectFlagClaim => self
                .claim_candidates(player)
                .into_iter()
                .powerset()
                .map(|flags| Move::Claim {
                    flags: flags.into_iter().collect(),
                })
                .collect(),
            TurnState::PlayHandCard => {
                let mut moves = self.hand_moves(player);
                if self.turn.can_pass {
                    moves.push(Move::Pass);
                }
                moves
            }
            TurnState::SelectFromDeck | TurnState::ScoutDraw { .. } => self
                .drawable_decks()
                .into_iter()
                .map(|deck| Move::Draw { deck })
                .collect(),
            TurnState::ReturnScoutedCards => {
                let hand = self.hand(player);
                hand.iter()
                    .copied()
                    .combinations(SCOUT_RETURNS.min(hand.len()))
                    .map(|cards| {
                        let (troops, tactics): (Returned, Returned) =
                            cards.into_iter().partition(|c| c.is_troop());
                        Move::ReturnScouted { troops, tactics }
                    })
                    .collect()
            }
        };
        moves.push(Move::GiveUp);
        moves
    }

    /// Moves that play a hand card.
    fn hand_moves(&self, player: PlayerId) -> Vec<Move> {
        let opponent = player.opponent();
        let tactic_ok = self.may_play_tactic(player);
        let unclaimed: SmallVec<[FlagId; FLAG_COUNT]> = self
            .flags
            .iter()
            .filter(|f| !f.is_claimed())
            .map(Flag::id)
            .collect();
        let open: SmallVec<[FlagId; FLAG_COUNT]> = unclaimed
            .iter()
            .copied()
            .filter(|&f| self.flag(f).has_free_slot(&self.table, player))
            .collect();

        let mut moves = Vec::new();
        for &card in self.hand(player) {
            let Some(tactic) = card.tactic_of() else {
                moves.extend(open.iter().map(|&flag| Move::SetOnFlag { card, flag }));
                continue;
            };
            if !tactic_ok {
                continue;
            }

            match tactic.class() {
                TacticClass::Morale => {
                    if !(tactic.is_leader() && self.leader_played(player)) {
                        moves.extend(open.iter().map(|&flag| Move::SetOnFlag { card, flag }));
                    }
                }
                TacticClass::Environment => {
                    moves.extend(unclaimed.iter().map(|&flag| Move::SetOnFlag { card, flag }));
                }
                TacticClass::Guile => match tactic {
                    Tactic::Scout => {
                        moves.extend(
                            self.drawable_decks()
                                .into_iter()
                                .map(|deck| Move::Scout { card, deck }),
                        );
                    }
                    Tactic::Deserter => {
                        for &flag in &unclaimed {
                            for &target in self.flag(flag).slot(&self.table, opponent) {
                                moves.push(Move::Deserter { card, flag, target });
                            }
                        }
                    }
                    Tactic::Traitor => {
                        for &source in &unclaimed {
                            let troops = self.flag(source).slot(&self.table, opponent);
                            for &target in troops.iter().filter(|c| c.is_troop()) {
                                for &dest in open.iter().filter(|&&d| d != source) {
                                    moves.push(Move::Traitor {
                                        card,
                                        source,
                                        target,
                                        dest,
                                    });
                                }
                            }
                        }
                    }
                    _ => {
                        for &source in &unclaimed {
                            for &target in self.flag(source).slot(&self.table, player) {
                                moves.push(Move::Redeploy {
                                    card,
                                    source,
                                    target,
                                    dest: None,
                                });
                                let dests = if target.is_formation_card() { &open } else { &unclaimed };
                                for &dest in dests.iter().filter(|&&d| d != source) {
                                    moves.push(Move::Redeploy {
                                        card,
                                        source,
                                        target,
                                        dest: Some(dest),
                                    });
                                }
                            }
                        }
                    }
                },
            }
        }
        moves
    }

    /// Whether `mv` may be applied now.
    #[must_use]
    pub fn is_legal(&self, mv: &Move) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(mv, Move::Pause | Move::GiveUp) || self.legal_moves().contains(mv)
    }

    // === Application ===

    /// Apply the `index`-th legal move.
    pub fn apply_index(&mut self, index: usize) -> EngineResult<(Move, MoveOutcome)> {
        let mut moves = self.legal_moves();
        if index >= moves.len() {
            return Err(InvalidMove::IndexOutOfRange {
                index,
                len: moves.len(),
            }
            .into());
        }
        let mv = moves.swap_remove(index);
        let outcome = self.apply(&mv)?;
        Ok((mv, outcome))
    }

    /// Apply a move. Nothing changes unless the move is legal.
    pub fn apply(&mut self, mv: &Move) -> EngineResult<MoveOutcome> {
        if self.is_terminal() {
            return Err(InvalidMove::GameOver.into());
        }
        if !self.is_legal(mv) {
            return Err(InvalidMove::NotLegal {
                mv: mv.clone(),
                state: self.turn.state,
            }
            .into());
        }

        let player = self.turn.player;
        let opponent = player.opponent();
        let hand = Zone::Hand(player);
        let dish = Zone::Dish(player);
        let mut outcome = MoveOutcome::default();
        debug!(%player, %mv, state = ?self.turn.state, "applying move");

        match mv {
            Move::Pause => return Ok(outcome),
            Move::GiveUp => {
                self.turn.state = TurnState::Quit { loser: player };
            }
            Move::Claim { flags } => {
                let mut failures = ClaimFailures::new();
                for &flag in flags {
                    match self.adjudicate(flag, player) {
                        ClaimVerdict::Claimable => {
                            self.flags[flag.index()].lock(player);
                            outcome.claimed.push(flag);
                        }
                        verdict => failures.insert(flag, verdict.evidence()),
                    }
                }
                outcome.claim_failures = failures;
                match self.flag_winner() {
                    Some(winner) => self.turn.state = TurnState::Finished { winner },
                    None => self.enter_play(player),
                }
            }
            Move::Draw { deck } => {
                outcome.dealt = Some(self.table.deal_top(*deck, hand)?);
                match self.turn.state {
                    TurnState::ScoutDraw { remaining } => self.continue_scout(remaining.saturating_sub(1)),
                    _ => self.end_turn(),
                }
            }
            Move::ReturnScouted { troops, tactics } => {
                for &card in troops.iter().chain(tactics.iter()) {
                    self.table
                        .relocate(card, hand, Zone::deck(card.deck()), ZonePosition::Bottom)?;
                }
                self.end_turn();
            }
            Move::SetOnFlag { card, flag } => {
                self.flags[flag.index()].place(&mut self.table, *card, hand, player)?;
                self.after_play();
            }
            Move::Scout { card, deck } => {
                self.table.relocate(*card, hand, dish, ZonePosition::Top)?;
                outcome.dealt = Some(self.table.deal_top(*deck, hand)?);
                self.continue_scout(SCOUT_EXTRA_DRAWS);
            }
            Move::Deserter { card, flag, target } => {
                self.table.relocate(*card, hand, dish, ZonePosition::Top)?;
                outcome.cascade = self.flags[flag.index()].withdraw(
                    &mut self.table,
                    *target,
                    opponent,
                    Zone::Dish(opponent),
                )?;
                self.after_play();
            }
            Move::Traitor {
                card,
                source,
                target,
                dest,
            } => {
                self.table.relocate(*card, hand, dish, ZonePosition::Top)?;
                outcome.cascade = self.flags[source.index()].withdraw(
                    &mut self.table,
                    *target,
                    opponent,
                    Zone::Slot(*dest, player),
                )?;
                self.flags[dest.index()].stamp(player);
                self.after_play();
            }
            Move::Redeploy {
                card,
                source,
                target,
                dest,
            } => {
                self.table.relocate(*card, hand, dish, ZonePosition::Top)?;
                let to = dest.map_or(dish, |d| Zone::Slot(d, player));
                outcome.cascade =
                    self.flags[source.index()].withdraw(&mut self.table, *target, player, to)?;
                if let Some(d) = dest {
                    if target.is_formation_card() {
                        self.flags[d.index()].stamp(player);
                    }
                }
                self.after_play();
            }
            Move::Pass => self.end_turn(),
        }

        outcome.winner = self.winner();
        Ok(outcome)
    }

    // === Turn transitions ===

    fn start_turn(&mut self, player: PlayerId) {
        self.turn = Turn::new(player, TurnState::SelectFlagClaim);
        if self.claim_candidates(player).is_empty() {
            self.enter_play(player);
        }
    }

    fn enter_play(&mut self, player: PlayerId) {
        self.turn = Turn {
            player,
            state: TurnState::PlayHandCard,
            can_pass: self.hand_moves(player).is_empty(),
        };
    }

    fn after_play(&mut self) {
        if self.drawable_decks().is_empty() {
            self.end_turn();
        } else {
            self.turn.state = TurnState::SelectFromDeck;
        }
    }

    fn continue_scout(&mut self, remaining: u8) {
        self.turn.state = if remaining == 0 || self.drawable_decks().is_empty() {
            TurnState::ReturnScoutedCards
        } else {
            TurnState::ScoutDraw { remaining }
        };
    }

    fn end_turn(&mut self) {
        self.start_turn(self.turn.player.opponent());
    }
}

/// Builds arbitrary positions for tests and analysis.
///
/// Cards not placed explicitly go to `rest_to`'s zone, or by default to the
/// bottom of their own deck.
///
/// ```
/// use battleline::cards::{CardIx, Color};
/// use battleline::core::{GameConfig, PlayerId};
/// use battleline::flags::FlagId;
/// use battleline::rules::{PositionBuilder, TurnState};
///
/// let red = |v| CardIx::troop(Color::Red, v).unwrap();
/// let flag = FlagId::new(0).unwrap();
/// let position = PositionBuilder::new(GameConfig::default())
///     .slot(flag, PlayerId::FIRST, &[red(1), red(2), red(3)])
///     .build()
///     .unwrap();
///
/// assert_eq!(position.turn().state, TurnState::SelectFlagClaim);
/// ```
#[derive(Clone, Debug)]
pub struct PositionBuilder {
    config: GameConfig,
    zones: Vec<(Zone, Vec<CardIx>)>,
    claimed: Vec<(FlagId, PlayerId)>,
    turn: Option<(PlayerId, TurnState)>,
    rest: Option<Zone>,
}

impl PositionBuilder {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            zones: Vec::new(),
            claimed: Vec::new(),
            turn: None,
            rest: None,
        }
    }

    #[must_use]
    pub fn hand(self, player: PlayerId, cards: &[CardIx]) -> Self {
        self.zone(Zone::Hand(player), cards)
    }

    /// Place cards on a player's side, in placement order.
    #[must_use]
    pub fn slot(self, flag: FlagId, player: PlayerId, cards: &[CardIx]) -> Self {
        self.zone(Zone::Slot(flag, player), cards)
    }

    #[must_use]
    pub fn dish(self, player: PlayerId, cards: &[CardIx]) -> Self {
        self.zone(Zone::Dish(player), cards)
    }

    /// Stack cards on top of a deck, last = top.
    #[must_use]
    pub fn deck_top(self, deck: DeckKind, cards: &[CardIx]) -> Self {
        self.zone(Zone::deck(deck), cards)
    }

    fn zone(mut self, zone: Zone, cards: &[CardIx]) -> Self {
        self.zones.push((zone, cards.to_vec()));
        self
    }

    #[must_use]
    pub fn claimed(mut self, flag: FlagId, player: PlayerId) -> Self {
        self.claimed.push((flag, player));
        self
    }

    /// Set the player to move and the state; otherwise seat 0 starts a turn.
    #[must_use]
    pub fn to_move(mut self, player: PlayerId, state: TurnState) -> Self {
        self.turn = Some((player, state));
        self
    }

    /// Send every card not placed explicitly to `zone`.
    #[must_use]
    pub fn rest_to(mut self, zone: Zone) -> Self {
        self.rest = Some(zone);
        self
    }

    pub fn build(self) -> Result<Position, InvariantViolation> {
        let mut listed = [false; crate::cards::CARD_COUNT];
        for card in self.zones.iter().flat_map(|(_, cards)| cards) {
            listed[card.offset()] = true;
        }

        let mut zones: Vec<(Zone, Vec<CardIx>)> = Vec::new();
        let (mut troops, mut tactics) = (Vec::new(), Vec::new());
        let mut rest = Vec::new();
        for card in CardIx::all().filter(|c| !listed[c.offset()]) {
            match (self.rest, card.deck()) {
                (Some(_), _) => rest.push(card),
                (None, DeckKind::Troop) => troops.push(card),
                (None, DeckKind::Tactic) => tactics.push(card),
            }
        }
        zones.push((Zone::TroopDeck, troops));
        zones.push((Zone::TacticDeck, tactics));
        if let Some(zone) = self.rest {
            zones.push((zone, rest));
        }
        zones.extend(self.zones.iter().cloned());

        let table = LocationTable::from_zones(zones)?;
        let mut flags: Vec<Flag> = FlagId::all().map(Flag::new).collect();
        for (zone, cards) in &self.zones {
            if let Zone::Slot(flag, player) = *zone {
                for _ in cards.iter().filter(|c| c.is_formation_card()) {
                    flags[flag.index()].stamp(player);
                }
            }
        }
        for &(flag, player) in &self.claimed {
            flags[flag.index()].lock(player);
        }

        let mut position = Position {
            table,
            flags,
            turn: Turn::new(PlayerId::FIRST, TurnState::PlayHandCard),
            config: self.config,
        };
        match self.turn {
            None => position.start_turn(PlayerId::FIRST),
            Some((player, TurnState::PlayHandCard)) => position.enter_play(player),
            Some((player, state)) => position.turn = Turn::new(player, state),
        }
        Ok(position)
    }
}
