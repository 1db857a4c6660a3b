//! Injectable time sources.
//!
//! Session timestamps are plain milliseconds so the tracker never depends on
//! wall-clock APIs directly. Tests drive a [`ManualClock`]; the running
//! service uses [`SystemClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Milliseconds since an arbitrary, monotonic-for-the-caller epoch.
pub type Millis = u64;

/// Source of "now" for session bookkeeping.
pub trait TimeSource: Send + Sync {
    fn now_millis(&self) -> Millis;
}

/// Wall-clock time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_millis(&self) -> Millis {
        // Pre-1970 clocks collapse to zero rather than wrapping.
        chrono::Utc::now().timestamp_millis().max(0) as Millis
    }
}

/// A clock that only moves when told to. Shared between threads in tests and
/// in the simulator.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl TimeSource for ManualClock {
    fn now_millis(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}
