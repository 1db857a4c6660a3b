//! Concurrent load simulator.
//!
//! Drives many worker threads through one `FavorAuthority` to check:
//! - how often actions are accepted, throttled, or ignored
//! - how favor and prestige accumulate per activity and faction
//! - that ledger balances equal the sum of issued receipts
//! - that the decay sweeper keeps the session map bounded

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{SimReport, WorkerTally};
pub use runner::run_simulation;
