//! Favor - concurrent progression ledgers with time-windowed combo sessions.
//!
//! Gameplay actions enter through [`authority::FavorAuthority`], which checks
//! eligibility, throttles them through per-activity session trackers, prices
//! them with the reward tables, and credits player favor and faction
//! prestige.

pub mod abilities;
pub mod authority;
pub mod build_info;
pub mod core;
pub mod ledger;
pub mod rewards;
pub mod session;
pub mod simulator;

pub use authority::{ActionEvent, AwardOutcome, FavorAuthority, RawMagnitude};
pub use crate::core::{FavorConfig, ManualClock, SystemClock, TimeSource};
pub use ledger::{FactionLedger, LedgerRegistry, ProgressionLedger};
pub use session::{ActionSessionTracker, DecaySweeper, SessionRegistry};
