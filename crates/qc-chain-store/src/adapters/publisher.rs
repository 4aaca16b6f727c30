//! Event publisher adapter for critical storage alarms.

use shared_types::{StorageCriticalError, StorageCriticalPayload};

/// Topics published by chain storage.
pub mod topics {
    /// Dead-letter topic for unrecoverable storage failures.
    pub const STORAGE_CRITICAL: &str = "storage.critical";
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

/// Event publisher trait for the storage subsystem's critical alarms.
pub trait StorageEventPublisher: Send + Sync {
    /// Publishes a `storage.critical` event to the dead-letter topic.
    fn publish_storage_critical(&self, payload: StorageCriticalPayload) -> Result<(), PublishError>;
}

/// No-op publisher for use without a connected event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl StorageEventPublisher for NoOpPublisher {
    fn publish_storage_critical(&self, _payload: StorageCriticalPayload) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Convenience constructors for the common alarm shapes.
pub fn disk_full_payload(available_percent: u8) -> StorageCriticalPayload {
    StorageCriticalPayload {
        error_type: StorageCriticalError::DiskFull,
        block_hash: None,
        description: format!("available disk space at {available_percent}%, below write threshold"),
    }
}

pub fn data_corruption_payload(block_hash: shared_types::Hash) -> StorageCriticalPayload {
    StorageCriticalPayload {
        error_type: StorageCriticalError::DataCorruption,
        block_hash: Some(block_hash),
        description: "checksum mismatch on file-mirror read".to_string(),
    }
}

#[cfg(test)]
pub struct RecordingPublisher {
    pub events: std::sync::Mutex<Vec<StorageCriticalPayload>>,
}

#[cfg(test)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl StorageEventPublisher for RecordingPublisher {
    fn publish_storage_critical(&self, payload: StorageCriticalPayload) -> Result<(), PublishError> {
        self.events.lock().unwrap().push(payload);
        Ok(())
    }
}
