//! Formation evaluation.
//!
//! A formation is the troops and morale tactics one side has committed to a
//! flag. Its strength is the formation type first, then the summed value.
//! Wild cards (leaders, Companion Cavalry, Shield Bearers) are resolved to
//! the strongest assignment of their allowed values; they adopt the common
//! color of the fixed troops.
//!
//! Evaluation never allocates: a formation holds at most four cards and
//! every assignment is checked in a fixed-size buffer.

use serde::{Deserialize, Serialize};

use crate::cards::{CardIx, CardKind};

/// Largest formation size (three, or four under Mud).
pub const MAX_FORMATION: usize = 4;

/// Formation types, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormationKind {
    /// Any cards.
    Host,
    /// Consecutive values.
    SkirmishLine,
    /// One color.
    BattalionOrder,
    /// One value.
    Phalanx,
    /// One color, consecutive values.
    Wedge,
}

/// The strength of a formation. Orders by kind, then sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Strength {
    pub kind: FormationKind,
    pub sum: u8,
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self.kind, self.sum)
    }
}

/// Evaluate the strongest reading of a set of formation cards.
///
/// Cards that do not count toward a formation (environment and guile
/// tactics) are ignored. Under Fog every formation is a Host.
///
/// ```
/// use battleline::cards::{CardIx, Color};
/// use battleline::flags::{evaluate, FormationKind};
///
/// let wedge = [
///     CardIx::troop(Color::Red, 8).unwrap(),
///     CardIx::troop(Color::Red, 9).unwrap(),
///     CardIx::troop(Color::Red, 10).unwrap(),
/// ];
/// let strength = evaluate(&wedge, false);
/// assert_eq!(strength.kind, FormationKind::Wedge);
/// assert_eq!(strength.sum, 27);
///
/// assert_eq!(evaluate(&wedge, true).kind, FormationKind::Host);
/// ```
#[must_use]
pub fn evaluate(cards: &[CardIx], fog: bool) -> Strength {
    let mut fixed = [0u8; MAX_FORMATION];
    let mut wilds: [&'static [u8]; MAX_FORMATION] = [&[]; MAX_FORMATION];
    let mut fixed_len = 0;
    let mut wild_len = 0;
    let mut color = None;
    let mut suited = true;

    for &card in cards.iter().filter(|c| c.is_formation_card()).take(MAX_FORMATION) {
        match card.kind() {
            CardKind::Troop { color: c, value } => {
                fixed[fixed_len] = value;
                fixed_len += 1;
                match color {
                    None => color = Some(c),
                    Some(existing) if existing != c => suited = false,
                    Some(_) => {}
                }
            }
            CardKind::Tactic(tactic) => {
                wilds[wild_len] = tactic.wild_values();
                wild_len += 1;
            }
        }
    }

    let len = fixed_len + wild_len;
    if len == 0 {
        return Strength {
            kind: FormationKind::Host,
            sum: 0,
        };
    }
    let mut values = [0u8; MAX_FORMATION];
    values[..fixed_len].copy_from_slice(&fixed[..fixed_len]);

    let mut best: Option<Strength> = None;
    let mut choice = [0usize; MAX_FORMATION];
    loop {
        for w in 0..wild_len {
            values[fixed_len + w] = wilds[w][choice[w]];
        }
        let strength = classify(&values[..len], suited, fog);
        if best.map_or(true, |b| strength > b) {
            best = Some(strength);
        }

        // Odometer over wild value choices.
        let mut w = 0;
        while w < wild_len {
            choice[w] += 1;
            if choice[w] < wilds[w].len() {
                break;
            }
            choice[w] = 0;
            w += 1;
        }
        if w == wild_len {
            break;
        }
    }

    best.unwrap_or(Strength {
        kind: FormationKind::Host,
        sum: 0,
    })
}

fn classify(values: &[u8], suited: bool, fog: bool) -> Strength {
    let sum = values.iter().sum();
    if fog {
        return Strength {
            kind: FormationKind::Host,
            sum,
        };
    }

    let mut sorted = [0u8; MAX_FORMATION];
    let sorted = &mut sorted[..values.len()];
    sorted.copy_from_slice(values);
    sorted.sort_unstable();

    let consecutive = sorted.windows(2).all(|w| w[1] == w[0] + 1);
    let same_value = sorted.windows(2).all(|w| w[1] == w[0]);

    let kind = match (suited, consecutive, same_value) {
        (true, true, _) => FormationKind::Wedge,
        (_, _, true) => FormationKind::Phalanx,
        (true, _, _) => FormationKind::BattalionOrder,
        (_, true, _) => FormationKind::SkirmishLine,
        _ => FormationKind::Host,
    };
    Strength { kind, sum }
}
