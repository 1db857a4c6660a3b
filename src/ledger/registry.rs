//! Keyed storage for ledgers.
//!
//! The map locks are only held to find or insert a ledger; every mutation
//! then goes through that ledger's own lock, so unrelated players and
//! factions never block each other.

use super::faction::FactionLedger;
use super::progression::ProgressionLedger;
use crate::core::config::FavorConfig;
use crate::core::ids::{FactionId, PlayerId};
use crate::core::sync::{read, write};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

#[derive(Debug)]
pub struct LedgerRegistry {
    players: RwLock<HashMap<PlayerId, Arc<ProgressionLedger>>>,
    factions: RwLock<HashMap<FactionId, Arc<FactionLedger>>>,
    switch_penalty_fraction: f64,
    activity_log_capacity: usize,
}

impl LedgerRegistry {
    pub fn new(switch_penalty_fraction: f64, activity_log_capacity: usize) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            factions: RwLock::new(HashMap::new()),
            switch_penalty_fraction,
            activity_log_capacity,
        }
    }

    pub fn from_config(config: &FavorConfig) -> Self {
        Self::new(
            config.switch_penalty_fraction,
            config.activity_log_capacity,
        )
    }

    /// The player's ledger, created empty on first use.
    pub fn player(&self, id: &PlayerId) -> Arc<ProgressionLedger> {
        get_or_insert_with(&self.players, id, || {
            ProgressionLedger::new(id.clone(), self.switch_penalty_fraction)
        })
    }

    pub fn find_player(&self, id: &PlayerId) -> Option<Arc<ProgressionLedger>> {
        read(&self.players).get(id).cloned()
    }

    /// The faction's ledger, created empty on first use.
    pub fn faction(&self, id: &FactionId) -> Arc<FactionLedger> {
        get_or_insert_with(&self.factions, id, || {
            FactionLedger::new(id.clone(), self.activity_log_capacity)
        })
    }

    pub fn find_faction(&self, id: &FactionId) -> Option<Arc<FactionLedger>> {
        read(&self.factions).get(id).cloned()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        read(&self.players).keys().cloned().collect()
    }

    pub fn player_count(&self) -> usize {
        read(&self.players).len()
    }
}

impl Default for LedgerRegistry {
    fn default() -> Self {
        Self::from_config(&FavorConfig::default())
    }
}

fn get_or_insert_with<K, V>(
    map: &RwLock<HashMap<K, Arc<V>>>,
    key: &K,
    make: impl FnOnce() -> V,
) -> Arc<V>
where
    K: Eq + Hash + Clone,
{
    if let Some(existing) = read(map).get(key) {
        return Arc::clone(existing);
    }
    // Another thread may have inserted between the read and write locks.
    Arc::clone(
        write(map)
            .entry(key.clone())
            .or_insert_with(|| Arc::new(make())),
    )
}
