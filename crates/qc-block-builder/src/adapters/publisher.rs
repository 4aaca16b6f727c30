//! Event publisher adapter for the block builder subsystem.

use shared_types::Hash;

/// Priority band used for `block.created`, per the event-sync priority
/// queue (`1` highest).
pub const PRIORITY_HIGH: u8 = 1;

/// Topics published by the block builder.
pub mod topics {
    /// A new block was assembled, signed, and appended.
    pub const BLOCK_CREATED: &str = "block.created";
}

/// Error type for publish operations.
#[derive(Debug, Clone)]
pub enum PublishError {
    NotConnected,
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

/// Publishes `block.created` at `PRIORITY_HIGH` once a block is durably
/// appended.
pub trait BlockEventPublisher: Send + Sync {
    fn publish_block_created(&self, block_hash: Hash, index: u64) -> Result<(), PublishError>;
}

/// No-op publisher for use without a connected event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl BlockEventPublisher for NoOpPublisher {
    fn publish_block_created(&self, _block_hash: Hash, _index: u64) -> Result<(), PublishError> {
        Ok(())
    }
}

#[cfg(test)]
pub struct RecordingPublisher {
    pub created: std::sync::Mutex<Vec<(Hash, u64)>>,
}

#[cfg(test)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            created: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl BlockEventPublisher for RecordingPublisher {
    fn publish_block_created(&self, block_hash: Hash, index: u64) -> Result<(), PublishError> {
        self.created.lock().unwrap().push((block_hash, index));
        Ok(())
    }
}
