//! Per-player favor account.
//!
//! One mutex per ledger: operations on the same player are linearizable,
//! operations on different players never contend.

use super::rank::FavorRank;
use super::Credit;
use crate::core::constants::SWITCH_EVENT_MEMORY;
use crate::core::ids::{AbilityId, PlayerId, SwitchEventId};
use crate::core::sync::lock;
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct ProgressionState {
    balance: u64,
    /// Always in [0, 1).
    fractional: f64,
    total_earned: u64,
    abilities: BTreeSet<AbilityId>,
    /// Most recent switch events, oldest first. Redelivery of a switch
    /// happens long before this many newer switches could follow it.
    applied_switches: VecDeque<SwitchEventId>,
}

/// A copy of a player's account for display or serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionSnapshot {
    pub player_id: PlayerId,
    pub balance: u64,
    pub fractional: f64,
    pub total_earned: u64,
    pub rank: FavorRank,
    pub abilities: Vec<AbilityId>,
}

#[derive(Debug)]
pub struct ProgressionLedger {
    player_id: PlayerId,
    switch_penalty_fraction: f64,
    state: Mutex<ProgressionState>,
}

impl ProgressionLedger {
    pub fn new(player_id: PlayerId, switch_penalty_fraction: f64) -> Self {
        Self {
            player_id,
            switch_penalty_fraction: switch_penalty_fraction.clamp(0.0, 1.0),
            state: Mutex::new(ProgressionState::default()),
        }
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn add(&self, amount: u64) -> Credit {
        let mut state = lock(&self.state);
        let total_before = state.total_earned;
        state.balance = state.balance.saturating_add(amount);
        state.total_earned = state.total_earned.saturating_add(amount);
        Credit {
            credited: amount,
            balance: state.balance,
            total_before,
            total_after: state.total_earned,
        }
    }

    /// Removes up to `amount`, clamping at zero. Returns what was removed.
    pub fn remove(&self, amount: u64) -> u64 {
        let mut state = lock(&self.state);
        let removed = amount.min(state.balance);
        state.balance -= removed;
        removed
    }

    /// Adds a fractional amount. Whole units move into the balance as soon
    /// as the accumulator reaches 1.0; the remainder is kept.
    pub fn add_fractional(&self, amount: f64) -> Credit {
        let mut state = lock(&self.state);
        let total_before = state.total_earned;
        let mut credited = 0;
        if amount.is_finite() && amount > 0.0 {
            state.fractional += amount;
            let whole = state.fractional.floor();
            if whole >= 1.0 {
                state.fractional -= whole;
                credited = whole as u64;
                state.balance = state.balance.saturating_add(credited);
                state.total_earned = state.total_earned.saturating_add(credited);
            }
        }
        Credit {
            credited,
            balance: state.balance,
            total_before,
            total_after: state.total_earned,
        }
    }

    /// Returns true if the ability was newly unlocked.
    pub fn unlock_ability(&self, id: AbilityId) -> bool {
        lock(&self.state).abilities.insert(id)
    }

    /// Returns true if the ability was unlocked before.
    pub fn lock_ability(&self, id: &AbilityId) -> bool {
        lock(&self.state).abilities.remove(id)
    }

    /// Returns the number of abilities removed.
    pub fn clear_abilities(&self) -> usize {
        let mut state = lock(&self.state);
        let removed = state.abilities.len();
        state.abilities.clear();
        removed
    }

    pub fn has_ability(&self, id: &AbilityId) -> bool {
        lock(&self.state).abilities.contains(id)
    }

    /// Charges the faction-switch penalty for `event`. Returns the favor
    /// lost, or `None` if this event was already charged.
    pub fn apply_switch_penalty(&self, event: SwitchEventId) -> Option<u64> {
        let mut state = lock(&self.state);
        if state.applied_switches.contains(&event) {
            return None;
        }
        if state.applied_switches.len() == SWITCH_EVENT_MEMORY {
            state.applied_switches.pop_front();
        }
        state.applied_switches.push_back(event);
        let lost = (state.balance as f64 * self.switch_penalty_fraction).floor() as u64;
        let lost = lost.min(state.balance);
        state.balance -= lost;
        Some(lost)
    }

    pub fn balance(&self) -> u64 {
        lock(&self.state).balance
    }

    pub fn fractional(&self) -> f64 {
        lock(&self.state).fractional
    }

    pub fn total_earned(&self) -> u64 {
        lock(&self.state).total_earned
    }

    pub fn rank(&self) -> FavorRank {
        FavorRank::from_total(self.total_earned())
    }

    pub fn abilities(&self) -> Vec<AbilityId> {
        lock(&self.state).abilities.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> ProgressionSnapshot {
        let state = lock(&self.state);
        ProgressionSnapshot {
            player_id: self.player_id.clone(),
            balance: state.balance,
            fractional: state.fractional,
            total_earned: state.total_earned,
            rank: FavorRank::from_total(state.total_earned),
            abilities: state.abilities.iter().cloned().collect(),
        }
    }
}
