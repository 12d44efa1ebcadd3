//! Card model: indices, kinds, and the static registry.
//!
//! ## Key Types
//!
//! - `CardIx`: stable card identity (troops `1..=60`, tactics `61..=70`)
//! - `CardKind`: troop color and value, or tactic identity
//! - `Tactic` / `TacticClass`: the ten tactic cards and their families
//! - `DeckKind`: which deck a card is dealt from

pub mod card;
pub mod registry;

pub use card::{
    CardIx, CardKind, Color, DeckKind, Tactic, TacticClass, CARD_COUNT, MAX_VALUE, TACTIC_COUNT,
    TROOP_COUNT,
};
pub use registry::CardDefinition;
