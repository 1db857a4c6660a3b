//! Simulation configuration.

use crate::core::config::FavorConfig;
use std::time::Duration;

/// Configuration for a load simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of worker threads delivering actions concurrently
    pub threads: u32,

    /// Actions each worker delivers
    pub actions_per_thread: u32,

    /// Distinct players the workers pick from
    pub players: u32,

    /// Factions (one domain each); players are spread round-robin
    pub factions: u32,

    /// Upper bound on simulated time advanced after each action, in millis
    pub max_step_millis: u64,

    /// Chance that an action targets the player's own domain
    pub eligible_rate: f64,

    /// Chance that the player used a proper tool
    pub tool_rate: f64,

    /// Real-time interval between decay sweeps (None = the engine's
    /// `sweep_interval_secs`)
    pub sweep_interval: Option<Duration>,

    /// Engine settings: session timings, reward tables, queue sizes
    pub engine: FavorConfig,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            threads: 8,
            actions_per_thread: 10_000,
            players: 64,
            factions: 4,
            max_step_millis: 1_500,
            eligible_rate: 0.9,
            tool_rate: 0.8,
            sweep_interval: Some(Duration::from_millis(5)),
            engine: FavorConfig::default(),
            seed: None,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Small run for smoke testing
    pub fn quick() -> Self {
        Self {
            threads: 4,
            actions_per_thread: 500,
            players: 16,
            ..Default::default()
        }
    }

    /// Many threads hammering few players, to maximize same-player contention
    pub fn contention() -> Self {
        Self {
            threads: 16,
            actions_per_thread: 5_000,
            players: 4,
            factions: 2,
            max_step_millis: 200,
            ..Default::default()
        }
    }

    pub fn total_actions(&self) -> u64 {
        self.threads as u64 * self.actions_per_thread as u64
    }
}
