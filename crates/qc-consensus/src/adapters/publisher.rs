//! Event publisher adapter for the consensus subsystem.

use shared_types::Address;

/// Topics published by consensus.
pub mod topics {
    /// A validator crossed into or out of the active set.
    pub const VALIDATOR_STATUS_CHANGED: &str = "consensus.validator_status_changed";
}

/// Error type for publish operations.
#[derive(Debug, Clone)]
pub enum PublishError {
    /// The event bus is not connected.
    NotConnected,
    /// Internal error.
    Internal(String),
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "event bus not connected"),
            Self::Internal(e) => write!(f, "internal error: {e}"),
        }
    }
}

impl std::error::Error for PublishError {}

/// Event publisher trait for consensus.
pub trait ConsensusEventPublisher: Send + Sync {
    /// Publishes a validator status transition (e.g. into `Jailed`).
    fn publish_validator_status_changed(&self, address: Address, status: &str) -> Result<(), PublishError>;
}

/// No-op publisher for use without a connected event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl ConsensusEventPublisher for NoOpPublisher {
    fn publish_validator_status_changed(&self, _address: Address, _status: &str) -> Result<(), PublishError> {
        Ok(())
    }
}

#[cfg(test)]
pub struct RecordingPublisher {
    pub changes: std::sync::Mutex<Vec<(Address, String)>>,
}

#[cfg(test)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            changes: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl ConsensusEventPublisher for RecordingPublisher {
    fn publish_validator_status_changed(&self, address: Address, status: &str) -> Result<(), PublishError> {
        self.changes.lock().unwrap().push((address, status.to_string()));
        Ok(())
    }
}
