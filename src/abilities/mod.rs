//! Unlockable abilities for players and factions.
//!
//! Abilities are gated by rank and by prerequisite abilities on the same
//! ledger. Unlock attempts that fail any gate are silent no-ops.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
