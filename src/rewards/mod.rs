//! Reward tables and the pure calculator over them.
//!
//! Nothing in this module holds state; the same inputs always produce the
//! same reward.

pub mod calculator;
pub mod types;

pub use calculator::{compute, Reward, RewardBasis};
pub use types::{
    ActivityKind, ComboTable, ComboTier, MaterialRewards, MaterialTier, RewardSource,
    RewardTables, RoundingPolicy,
};
