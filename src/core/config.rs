//! Engine configuration loaded from `~/.favor/config.json`.
//!
//! Every key is optional; missing keys fall back to the balance constants.

use super::clock::Millis;
use super::constants::{
    ACTION_COOLDOWN_SECONDS, ACTIVITY_LOG_CAPACITY, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
    DECAY_SWEEP_INTERVAL_SECONDS, NOTIFICATION_QUEUE_CAPACITY, SESSION_DECAY_TIMEOUT_SECONDS,
    SESSION_IDLE_TIMEOUT_SECONDS, SWITCH_PENALTY_FRACTION,
};
use crate::rewards::{ActivityKind, RewardTables};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The three session thresholds, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTimings {
    /// Actions closer together than this are rejected.
    pub cooldown_secs: u64,
    /// Gaps longer than this reset the combo to 1.
    pub idle_timeout_secs: u64,
    /// Sessions untouched for longer than this are evicted by the sweep.
    pub decay_timeout_secs: u64,
}

/// Largest timing whose millisecond value fits in [`Millis`].
pub const MAX_TIMING_SECS: u64 = Millis::MAX / 1_000;

impl SessionTimings {
    pub fn cooldown_millis(&self) -> Millis {
        self.cooldown_secs.saturating_mul(1_000)
    }

    pub fn idle_timeout_millis(&self) -> Millis {
        self.idle_timeout_secs.saturating_mul(1_000)
    }

    pub fn decay_timeout_millis(&self) -> Millis {
        self.decay_timeout_secs.saturating_mul(1_000)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let longest = self
            .cooldown_secs
            .max(self.idle_timeout_secs)
            .max(self.decay_timeout_secs);
        if longest > MAX_TIMING_SECS {
            return Err(ConfigError::Invalid(format!(
                "session timing {}s exceeds {}s",
                longest, MAX_TIMING_SECS
            )));
        }
        if self.cooldown_secs >= self.idle_timeout_secs {
            return Err(ConfigError::Invalid(format!(
                "cooldown ({}s) must be shorter than idle timeout ({}s)",
                self.cooldown_secs, self.idle_timeout_secs
            )));
        }
        if self.decay_timeout_secs <= self.idle_timeout_secs {
            return Err(ConfigError::Invalid(format!(
                "decay timeout ({}s) must be longer than idle timeout ({}s)",
                self.decay_timeout_secs, self.idle_timeout_secs
            )));
        }
        Ok(())
    }
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            cooldown_secs: ACTION_COOLDOWN_SECONDS,
            idle_timeout_secs: SESSION_IDLE_TIMEOUT_SECONDS,
            decay_timeout_secs: SESSION_DECAY_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FavorConfig {
    pub session: SessionTimings,
    /// Per-activity timings that replace `session` for that activity.
    pub session_overrides: BTreeMap<ActivityKind, SessionTimings>,
    pub sweep_interval_secs: u64,
    /// Fraction of a player's balance lost when switching factions.
    pub switch_penalty_fraction: f64,
    pub activity_log_capacity: usize,
    pub notification_capacity: usize,
    pub rewards: RewardTables,
}

impl FavorConfig {
    pub fn timings_for(&self, kind: ActivityKind) -> SessionTimings {
        self.session_overrides
            .get(&kind)
            .copied()
            .unwrap_or(self.session)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;
        for (kind, timings) in &self.session_overrides {
            timings
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("{}: {}", kind.name(), e)))?;
        }
        if !(0.0..=1.0).contains(&self.switch_penalty_fraction) {
            return Err(ConfigError::Invalid(format!(
                "switch penalty fraction {} is outside [0, 1]",
                self.switch_penalty_fraction
            )));
        }
        if self.activity_log_capacity == 0 {
            return Err(ConfigError::Invalid(
                "activity log capacity must be at least 1".to_string(),
            ));
        }
        if self.notification_capacity == 0 {
            return Err(ConfigError::Invalid(
                "notification capacity must be at least 1".to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "sweep interval must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: FavorConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `~/.favor/config.json`, or defaults if it is missing or invalid.
    pub fn load() -> Self {
        let path = match config_path() {
            Ok(p) => p,
            Err(_) => return Self::default(),
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

impl Default for FavorConfig {
    fn default() -> Self {
        Self {
            session: SessionTimings::default(),
            session_overrides: BTreeMap::new(),
            sweep_interval_secs: DECAY_SWEEP_INTERVAL_SECONDS,
            switch_penalty_fraction: SWITCH_PENALTY_FRACTION,
            activity_log_capacity: ACTIVITY_LOG_CAPACITY,
            notification_capacity: NOTIFICATION_QUEUE_CAPACITY,
            rewards: RewardTables::default(),
        }
    }
}

/// Get the config file path (~/.favor/config.json).
pub fn config_path() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
