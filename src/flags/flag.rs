//! Flags: claim state and slot operations.
//!
//! A `Flag` stores only what cannot be derived from the location table: its
//! claim state and the placement stamps used for the completed-first tie
//! break. Slot contents live in the table and are read through it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::claim::{adjudicate, ClaimQuery, ClaimVerdict};
use super::formation::{evaluate, MAX_FORMATION};
use crate::cards::{CardIx, Tactic};
use crate::core::{InvariantViolation, PlayerId, PlayerMap, FLAG_COUNT};
use crate::zones::{LocationTable, Zone, ZonePosition};

/// Formation size without Mud.
pub const BASE_CAPACITY: usize = 3;

/// Formation cards on one side of one flag.
pub type Formation = SmallVec<[CardIx; MAX_FORMATION]>;

/// Cards dished by a mud cascade (at most one per side).
pub type Cascade = SmallVec<[CardIx; 2]>;

/// Flag identifier: 0..9, left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FlagId(u8);

impl FlagId {
    /// Create a flag ID, or `None` outside `0..9`.
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < FLAG_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Zero-based flag position.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every flag, left to right.
    pub fn all() -> impl Iterator<Item = FlagId> {
        (0..FLAG_COUNT as u8).map(Self)
    }
}

impl TryFrom<u8> for FlagId {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id).ok_or_else(|| format!("no flag {id}"))
    }
}

impl From<FlagId> for u8 {
    fn from(flag: FlagId) -> Self {
        flag.0
    }
}

impl std::fmt::Display for FlagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who holds a flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimState {
    #[default]
    Unclaimed,
    ClaimedBy(PlayerId),
}

/// One of the nine flags.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flag {
    id: FlagId,
    claim: ClaimState,
    /// Formation-card placements made on this flag so far.
    placements: u32,
    /// Placement count at each side's latest formation-card placement.
    last_placed: PlayerMap<u32>,
}

impl Flag {
    /// Create an unclaimed flag.
    #[must_use]
    pub fn new(id: FlagId) -> Self {
        Self {
            id,
            claim: ClaimState::Unclaimed,
            placements: 0,
            last_placed: PlayerMap::with_value(0),
        }
    }

    // === Claim state ===

    #[must_use]
    pub fn id(&self) -> FlagId {
        self.id
    }

    #[must_use]
    pub fn claim(&self) -> ClaimState {
        self.claim
    }

    /// The player holding this flag, if any.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        match self.claim {
            ClaimState::Unclaimed => None,
            ClaimState::ClaimedBy(p) => Some(p),
        }
    }

    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claim != ClaimState::Unclaimed
    }

    /// Lock the flag to a player. A claimed flag keeps its owner.
    pub(crate) fn lock(&mut self, player: PlayerId) {
        if self.claim == ClaimState::Unclaimed {
            self.claim = ClaimState::ClaimedBy(player);
        }
    }

    // === Slot queries ===

    /// Every card on a player's side, formation or not.
    #[must_use]
    pub fn slot<'t>(&self, table: &'t LocationTable, player: PlayerId) -> &'t [CardIx] {
        table.cards(Zone::Slot(self.id, player))
    }

    /// A player's formation cards, in placement order.
    #[must_use]
    pub fn formation(&self, table: &LocationTable, player: PlayerId) -> Formation {
        self.slot(table, player)
            .iter()
            .copied()
            .filter(|c| c.is_formation_card())
            .collect()
    }

    /// Whether a tactic lies on either side.
    #[must_use]
    pub fn has_tactic(&self, table: &LocationTable, tactic: Tactic) -> bool {
        matches!(table.zone_of(CardIx::tactic(tactic)), Zone::Slot(flag, _) if flag == self.id)
    }

    #[must_use]
    pub fn is_fogged(&self, table: &LocationTable) -> bool {
        self.has_tactic(table, Tactic::Fog)
    }

    /// Formation size on this flag: three, or four under Mud.
    #[must_use]
    pub fn capacity(&self, table: &LocationTable) -> usize {
        if self.has_tactic(table, Tactic::Mud) {
            BASE_CAPACITY + 1
        } else {
            BASE_CAPACITY
        }
    }

    /// Whether a player's formation is complete.
    #[must_use]
    pub fn is_complete(&self, table: &LocationTable, player: PlayerId) -> bool {
        self.formation(table, player).len() >= self.capacity(table)
    }

    /// Whether a player may add a formation card here.
    #[must_use]
    pub fn has_free_slot(&self, table: &LocationTable, player: PlayerId) -> bool {
        !self.is_claimed() && self.formation(table, player).len() < self.capacity(table)
    }

    /// Whether `player` made their latest placement before the opponent.
    #[must_use]
    pub fn completed_first(&self, player: PlayerId) -> bool {
        self.last_placed[player] < self.last_placed[player.opponent()]
    }

    // === Slot operations ===

    /// Record a formation-card placement by `player`.
    pub(crate) fn stamp(&mut self, player: PlayerId) {
        self.placements += 1;
        self.last_placed[player] = self.placements;
    }

    /// Move a card from `from` onto a player's side.
    pub fn place(
        &mut self,
        table: &mut LocationTable,
        card: CardIx,
        from: Zone,
        player: PlayerId,
    ) -> Result<(), InvariantViolation> {
        table.relocate(card, from, Zone::Slot(self.id, player), ZonePosition::Top)?;
        if card.is_formation_card() {
            self.stamp(player);
        }
        Ok(())
    }

    /// Move a card off a player's side to `to`.
    ///
    /// Removing Mud runs the mud cascade; the dished cards are returned.
    pub fn withdraw(
        &mut self,
        table: &mut LocationTable,
        card: CardIx,
        player: PlayerId,
        to: Zone,
    ) -> Result<Cascade, InvariantViolation> {
        table.relocate(card, Zone::Slot(self.id, player), to, ZonePosition::Top)?;
        if card == CardIx::tactic(Tactic::Mud) {
            self.cascade(table)
        } else {
            Ok(Cascade::new())
        }
    }

    /// Trim every over-capacity side back to capacity.
    ///
    /// Each such side dishes the card whose removal leaves the strongest
    /// formation, the first such card in slot order on ties.
    pub fn cascade(&mut self, table: &mut LocationTable) -> Result<Cascade, InvariantViolation> {
        let capacity = self.capacity(table);
        let fog = self.is_fogged(table);
        let mut dished = Cascade::new();

        for player in PlayerId::both() {
            let formation = self.formation(table, player);
            if formation.len() <= capacity {
                continue;
            }

            let mut best: Option<(CardIx, _)> = None;
            for skip in 0..formation.len() {
                let rest: Formation = formation
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != skip)
                    .map(|(_, &c)| c)
                    .collect();
                let strength = evaluate(&rest, fog);
                if best.map_or(true, |(_, s)| strength > s) {
                    best = Some((formation[skip], strength));
                }
            }

            if let Some((card, _)) = best {
                table.relocate(card, Zone::Slot(self.id, player), Zone::Dish(player), ZonePosition::Top)?;
                debug!(flag = %self.id, %player, %card, "mud cascade dished card");
                dished.push(card);
            }
        }

        Ok(dished)
    }

    /// Adjudicate a claim by `claimant` against the given unseen cards.
    #[must_use]
    pub fn adjudicate(
        &self,
        table: &LocationTable,
        claimant: PlayerId,
        unseen: &[CardIx],
        leaders_allowed: bool,
    ) -> ClaimVerdict {
        let mine = self.formation(table, claimant);
        let theirs = self.formation(table, claimant.opponent());
        adjudicate(&ClaimQuery {
            claimant: &mine,
            opponent: &theirs,
            capacity: self.capacity(table),
            fog: self.is_fogged(table),
            claimant_first: self.completed_first(claimant),
            unseen,
            leaders_allowed,
        })
    }
}
