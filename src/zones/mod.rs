//! Zone system for card locations.
//!
//! Battleline has a fixed zone layout: two decks, a hand and a dish per
//! player, and one slot per player on each of the nine flags.
//!
//! ## Key Types
//!
//! - `Zone`: a card location
//! - `LocationTable`: card location tracking and relocation
//! - `ZonePosition`: where a relocated card lands in its new zone

pub mod location;

pub use location::{LocationTable, Zone, ZonePosition, ZONE_COUNT};
