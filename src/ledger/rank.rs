//! Rank tiers derived from lifetime earnings.

use crate::core::constants::{FAVOR_RANK_THRESHOLDS, PRESTIGE_RANK_THRESHOLDS};
use serde::{Deserialize, Serialize};

/// Individual standing, from lifetime favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FavorRank {
    Initiate,
    Disciple,
    Zealot,
    Champion,
    Avatar,
}

impl FavorRank {
    pub const ALL: [FavorRank; 5] = [
        FavorRank::Initiate,
        FavorRank::Disciple,
        FavorRank::Zealot,
        FavorRank::Champion,
        FavorRank::Avatar,
    ];

    pub fn from_total(total_earned: u64) -> Self {
        rank_index(&FAVOR_RANK_THRESHOLDS, total_earned)
            .map(|i| Self::ALL[i])
            .unwrap_or(FavorRank::Initiate)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FavorRank::Initiate => "Initiate",
            FavorRank::Disciple => "Disciple",
            FavorRank::Zealot => "Zealot",
            FavorRank::Champion => "Champion",
            FavorRank::Avatar => "Avatar",
        }
    }

    /// Lifetime favor needed to reach this rank.
    pub fn threshold(&self) -> u64 {
        let i = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        FAVOR_RANK_THRESHOLDS[i]
    }
}

/// Collective standing, from a faction's lifetime prestige.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrestigeRank {
    Fledgling,
    Established,
    Renowned,
    Legendary,
    Mythic,
}

impl PrestigeRank {
    pub const ALL: [PrestigeRank; 5] = [
        PrestigeRank::Fledgling,
        PrestigeRank::Established,
        PrestigeRank::Renowned,
        PrestigeRank::Legendary,
        PrestigeRank::Mythic,
    ];

    pub fn from_total(total_earned: u64) -> Self {
        rank_index(&PRESTIGE_RANK_THRESHOLDS, total_earned)
            .map(|i| Self::ALL[i])
            .unwrap_or(PrestigeRank::Fledgling)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrestigeRank::Fledgling => "Fledgling",
            PrestigeRank::Established => "Established",
            PrestigeRank::Renowned => "Renowned",
            PrestigeRank::Legendary => "Legendary",
            PrestigeRank::Mythic => "Mythic",
        }
    }

    pub fn threshold(&self) -> u64 {
        let i = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        PRESTIGE_RANK_THRESHOLDS[i]
    }
}

fn rank_index(thresholds: &[u64], total: u64) -> Option<usize> {
    thresholds.iter().rposition(|&min| total >= min)
}
