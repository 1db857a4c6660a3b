use thiserror::Error;

/// Faults raised by collaborators outside the engine. The authority logs
/// these and treats the action as not eligible; they never reach callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("affiliation lookup failed: {0}")]
    LookupFailed(String),
    #[error("notification queue is full")]
    SinkFull,
    #[error("notification receiver is gone")]
    SinkDisconnected,
}
