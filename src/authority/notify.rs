//! Outbound notifications.
//!
//! Sending is fire-and-forget: sinks must never block, and a failed send
//! never undoes a ledger mutation.

use super::error::CollaboratorError;
use crate::core::config::FavorConfig;
use crate::core::ids::{FactionId, PlayerId};
use crate::ledger::{FavorRank, PrestigeRank};
use crate::rewards::ActivityKind;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Notification {
    FavorAwarded {
        player: PlayerId,
        activity: ActivityKind,
        combo: u32,
        favor: f64,
        balance: u64,
    },
    PrestigeAwarded {
        faction: FactionId,
        player: PlayerId,
        amount: u64,
        balance: u64,
    },
    FavorRankUp {
        player: PlayerId,
        rank: FavorRank,
    },
    PrestigeRankUp {
        faction: FactionId,
        rank: PrestigeRank,
    },
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), CollaboratorError>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Bounded queue drained by the UI or network layer. Drops notifications
/// when the queue is full instead of waiting.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Notification>,
}

impl ChannelSink {
    pub fn bounded(capacity: usize) -> (Self, Receiver<Notification>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }

    /// Queue sized by `notification_capacity`.
    pub fn from_config(config: &FavorConfig) -> (Self, Receiver<Notification>) {
        Self::bounded(config.notification_capacity)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) -> Result<(), CollaboratorError> {
        self.tx.try_send(notification).map_err(|e| match e {
            TrySendError::Full(_) => CollaboratorError::SinkFull,
            TrySendError::Disconnected(_) => CollaboratorError::SinkDisconnected,
        })
    }
}
