//! Per-player combo sessions for one activity.
//!
//! State machine on `record_action(player, now)`:
//!
//! - no session: create one with combo 1, accepted
//! - `now - last < cooldown`: rejected, nothing changes
//! - `now - last > idle_timeout`: combo resets to 1, accepted
//! - otherwise: combo + 1, accepted
//!
//! Sessions are only removed by [`ActionSessionTracker::sweep`], once
//! `now - last > decay_timeout`.

use crate::core::clock::Millis;
use crate::core::config::SessionTimings;
use crate::core::ids::PlayerId;
use crate::core::sync::{lock, read, try_lock, write};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Result of recording one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub accepted: bool,
    /// Combo after the call (unchanged when rejected).
    pub combo: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub combo: u32,
    pub last_action: Millis,
}

#[derive(Debug)]
struct ActionSession {
    combo: u32,
    last_action: Millis,
    /// Set by the sweep when it removes this session from the map. A caller
    /// still holding the old handle must start over with a fresh session.
    evicted: bool,
}

impl ActionSession {
    fn new(now: Millis) -> Self {
        Self {
            combo: 1,
            last_action: now,
            evicted: false,
        }
    }
}

enum Lookup {
    Created,
    Existing(Arc<Mutex<ActionSession>>),
}

#[derive(Debug)]
pub struct ActionSessionTracker {
    cooldown: Millis,
    idle_timeout: Millis,
    decay_timeout: Millis,
    sessions: RwLock<HashMap<PlayerId, Arc<Mutex<ActionSession>>>>,
}

impl ActionSessionTracker {
    pub fn new(timings: SessionTimings) -> Self {
        Self {
            cooldown: timings.cooldown_millis(),
            idle_timeout: timings.idle_timeout_millis(),
            decay_timeout: timings.decay_timeout_millis(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn record_action(&self, player: &PlayerId, now: Millis) -> SessionOutcome {
        loop {
            let session = match self.lookup_or_create(player, now) {
                Lookup::Created => {
                    return SessionOutcome {
                        accepted: true,
                        combo: 1,
                    }
                }
                Lookup::Existing(session) => session,
            };
            let mut session = lock(&session);
            if session.evicted {
                continue;
            }
            return self.transition(&mut session, now);
        }
    }

    fn lookup_or_create(&self, player: &PlayerId, now: Millis) -> Lookup {
        if let Some(existing) = read(&self.sessions).get(player) {
            return Lookup::Existing(Arc::clone(existing));
        }
        match write(&self.sessions).entry(player.clone()) {
            Entry::Occupied(entry) => Lookup::Existing(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(Mutex::new(ActionSession::new(now))));
                Lookup::Created
            }
        }
    }

    fn transition(&self, session: &mut ActionSession, now: Millis) -> SessionOutcome {
        let elapsed = now.saturating_sub(session.last_action);
        if elapsed < self.cooldown {
            return SessionOutcome {
                accepted: false,
                combo: session.combo,
            };
        }
        if elapsed > self.idle_timeout {
            session.combo = 1;
        } else {
            session.combo = session.combo.saturating_add(1);
        }
        session.last_action = now;
        SessionOutcome {
            accepted: true,
            combo: session.combo,
        }
    }

    fn is_decayed(&self, session: &ActionSession, now: Millis) -> bool {
        now.saturating_sub(session.last_action) > self.decay_timeout
    }

    /// Evicts sessions idle for longer than the decay timeout. Returns the
    /// number evicted.
    ///
    /// Candidates are collected under the read lock, then re-checked under
    /// the write lock: sessions that are busy or were touched since the scan
    /// are skipped and left for the next sweep.
    pub fn sweep(&self, now: Millis) -> usize {
        let stale: Vec<(PlayerId, Arc<Mutex<ActionSession>>)> = read(&self.sessions)
            .iter()
            .filter(|(_, session)| {
                try_lock(session).is_some_and(|s| self.is_decayed(&s, now))
            })
            .map(|(player, session)| (player.clone(), Arc::clone(session)))
            .collect();
        if stale.is_empty() {
            return 0;
        }

        let mut sessions = write(&self.sessions);
        let mut evicted = 0;
        for (player, session) in stale {
            let same_entry = sessions
                .get(&player)
                .is_some_and(|current| Arc::ptr_eq(current, &session));
            if !same_entry {
                continue;
            }
            let Some(mut guard) = try_lock(&session) else {
                continue;
            };
            if !self.is_decayed(&guard, now) {
                continue;
            }
            guard.evicted = true;
            drop(guard);
            sessions.remove(&player);
            evicted += 1;
        }
        evicted
    }

    pub fn session(&self, player: &PlayerId) -> Option<SessionSnapshot> {
        let session = read(&self.sessions).get(player).cloned()?;
        let session = lock(&session);
        Some(SessionSnapshot {
            combo: session.combo,
            last_action: session.last_action,
        })
    }

    pub fn len(&self) -> usize {
        read(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
