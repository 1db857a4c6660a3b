//! Progression ledgers: per-player favor and per-faction prestige.
//!
//! Each ledger owns its state behind its own lock. Readers only ever get
//! copies (snapshots, `Vec`s), never live views.

pub mod faction;
pub mod membership;
pub mod progression;
pub mod rank;
pub mod registry;

pub use faction::{ActivityEntry, ActivityEvent, FactionLedger, FactionRole, FactionSnapshot};
pub use membership::{assign_role, join_faction, leave_faction, switch_faction, SwitchOutcome};
pub use progression::{ProgressionLedger, ProgressionSnapshot};
pub use rank::{FavorRank, PrestigeRank};
pub use registry::LedgerRegistry;

/// Result of crediting a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credit {
    /// Whole units added to the balance by this call.
    pub credited: u64,
    /// Balance after the call.
    pub balance: u64,
    /// Lifetime earnings before and after the call.
    pub total_before: u64,
    pub total_after: u64,
}
