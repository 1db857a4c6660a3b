//! One session tracker per activity kind.
//!
//! Passed explicitly (usually behind an `Arc`) to whoever records actions or
//! sweeps, so every test can build its own isolated set of trackers.

use super::tracker::{ActionSessionTracker, SessionOutcome, SessionSnapshot};
use crate::core::clock::Millis;
use crate::core::config::FavorConfig;
use crate::core::ids::PlayerId;
use crate::rewards::ActivityKind;

#[derive(Debug)]
pub struct SessionRegistry {
    /// Indexed by [`ActivityKind::index`].
    trackers: Vec<ActionSessionTracker>,
}

impl SessionRegistry {
    pub fn from_config(config: &FavorConfig) -> Self {
        Self {
            trackers: ActivityKind::ALL
                .iter()
                .map(|kind| ActionSessionTracker::new(config.timings_for(*kind)))
                .collect(),
        }
    }

    pub fn tracker(&self, kind: ActivityKind) -> &ActionSessionTracker {
        &self.trackers[kind.index()]
    }

    pub fn record_action(
        &self,
        kind: ActivityKind,
        player: &PlayerId,
        now: Millis,
    ) -> SessionOutcome {
        self.tracker(kind).record_action(player, now)
    }

    pub fn session(&self, kind: ActivityKind, player: &PlayerId) -> Option<SessionSnapshot> {
        self.tracker(kind).session(player)
    }

    /// Sweeps every tracker. Returns the total number of sessions evicted.
    pub fn sweep(&self, now: Millis) -> usize {
        self.trackers.iter().map(|t| t.sweep(now)).sum()
    }

    pub fn session_count(&self) -> usize {
        self.trackers.iter().map(|t| t.len()).sum()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::from_config(&FavorConfig::default())
    }
}
