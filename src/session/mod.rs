//! Ephemeral combo sessions and their decay sweep.

pub mod registry;
pub mod sweeper;
pub mod tracker;

pub use registry::SessionRegistry;
pub use sweeper::{DecaySweeper, SweepStats, SweeperHandle};
pub use tracker::{ActionSessionTracker, SessionOutcome, SessionSnapshot};
