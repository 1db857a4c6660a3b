//! Shared constants, identifiers, time sources, and configuration.

pub mod clock;
pub mod config;
pub mod constants;
pub mod ids;
pub(crate) mod sync;

pub use clock::{ManualClock, Millis, SystemClock, TimeSource};
pub use config::{ConfigError, FavorConfig, SessionTimings};
pub use ids::{AbilityId, DomainId, FactionId, PlayerId, SwitchEventId};
