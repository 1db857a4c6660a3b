//! Background decay sweep.
//!
//! Runs [`SessionRegistry::sweep`] on its own thread at a fixed interval.
//! Dropping or stopping the handle disconnects the stop channel, which wakes
//! the thread immediately.

use super::registry::SessionRegistry;
use crate::core::clock::TimeSource;
use crate::core::config::FavorConfig;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Totals over the sweeper's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub passes: u64,
    pub evicted: u64,
}

/// Shortest pause between passes; a zero interval would spin.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

pub struct DecaySweeper;

impl DecaySweeper {
    /// Sweeps at the configured `sweep_interval_secs`.
    pub fn from_config(
        sessions: Arc<SessionRegistry>,
        clock: Arc<dyn TimeSource>,
        config: &FavorConfig,
    ) -> io::Result<SweeperHandle> {
        Self::spawn(sessions, clock, config.sweep_interval())
    }

    pub fn spawn(
        sessions: Arc<SessionRegistry>,
        clock: Arc<dyn TimeSource>,
        interval: Duration,
    ) -> io::Result<SweeperHandle> {
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let thread = thread::Builder::new()
            .name("favor-decay-sweep".to_string())
            .spawn(move || {
                log::info!("Decay sweeper started (every {:?})", interval);
                let mut stats = SweepStats::default();
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let evicted = sessions.sweep(clock.now_millis());
                            stats.passes += 1;
                            stats.evicted += evicted as u64;
                            if evicted > 0 {
                                log::info!("Decay sweep evicted {} idle sessions", evicted);
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::info!(
                    "Decay sweeper stopped after {} passes ({} evicted)",
                    stats.passes,
                    stats.evicted
                );
                stats
            })?;
        Ok(SweeperHandle {
            interval,
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

pub struct SweeperHandle {
    interval: Duration,
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<SweepStats>>,
}

impl SweeperHandle {
    /// Pause between passes, after clamping.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Halts the sweeper and waits for its current pass to finish.
    pub fn stop(mut self) -> SweepStats {
        self.shutdown()
    }

    fn shutdown(&mut self) -> SweepStats {
        self.stop_tx.take();
        match self.thread.take() {
            Some(thread) => thread.join().unwrap_or_else(|_| {
                log::warn!("Decay sweeper thread panicked");
                SweepStats::default()
            }),
            None => SweepStats::default(),
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::ids::PlayerId;
    use crate::rewards::ActivityKind;
    use std::time::Instant;

    #[test]
    fn test_sweeper_evicts_in_background() {
        let sessions = Arc::new(SessionRegistry::default());
        let clock = Arc::new(ManualClock::new(0));
        sessions.record_action(ActivityKind::Mining, &PlayerId::new("alice"), 0);

        let handle = DecaySweeper::spawn(
            Arc::clone(&sessions),
            clock.clone(),
            Duration::from_millis(5),
        )
        .unwrap();
        clock.advance_secs(91);

        let deadline = Instant::now() + Duration::from_secs(5);
        while sessions.session_count() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        let stats = handle.stop();
        assert_eq!(sessions.session_count(), 0);
        assert_eq!(stats.evicted, 1);
        assert!(stats.passes >= 1);
    }

    #[test]
    fn test_stop_is_prompt() {
        let sessions = Arc::new(SessionRegistry::default());
        let handle = DecaySweeper::spawn(
            sessions,
            Arc::new(ManualClock::new(0)),
            Duration::from_secs(3600),
        )
        .unwrap();
        let started = Instant::now();
        let stats = handle.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(stats.passes, 0);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let sessions = Arc::new(SessionRegistry::default());
        let handle = DecaySweeper::spawn(
            Arc::clone(&sessions),
            Arc::new(ManualClock::new(0)),
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(handle.interval(), MIN_SWEEP_INTERVAL);
        let started = Instant::now();
        thread::sleep(Duration::from_millis(20));
        let stats = handle.stop();
        // At most one pass per elapsed millisecond
        let ceiling = started.elapsed().as_millis() as u64 + 1;
        assert!(stats.passes <= ceiling, "{} passes", stats.passes);
    }

    #[test]
    fn test_from_config_uses_configured_interval() {
        let config = FavorConfig {
            sweep_interval_secs: 7,
            ..Default::default()
        };
        let handle = DecaySweeper::from_config(
            Arc::new(SessionRegistry::from_config(&config)),
            Arc::new(ManualClock::new(0)),
            &config,
        )
        .unwrap();
        assert_eq!(handle.interval(), Duration::from_secs(7));
        assert_eq!(handle.stop().passes, 0);
    }
}
