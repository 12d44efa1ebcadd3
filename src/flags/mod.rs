//! Flags, formations, and claim adjudication.
//!
//! ## Key Types
//!
//! - `FlagId` / `Flag`: the nine contested flags and their claim state
//! - `Strength` / `FormationKind`: formation ranking
//! - `ClaimVerdict`: outcome of adjudicating a claim, with counter-evidence

pub mod claim;
pub mod flag;
pub mod formation;

pub use claim::{adjudicate, ClaimQuery, ClaimVerdict, Evidence};
pub use flag::{Cascade, ClaimState, Flag, FlagId, Formation, BASE_CAPACITY};
pub use formation::{evaluate, FormationKind, Strength, MAX_FORMATION};
