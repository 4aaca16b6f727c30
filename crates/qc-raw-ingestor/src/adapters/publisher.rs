//! Event publisher adapter for the raw ingestor.
//!
//! Emits `tx.received` once a raw transaction has been decoded, recovered
//! and accepted into the mempool, for fan-out by `qc-event-sync`.

use shared_types::Hash;

/// Topics published by the raw ingestor.
pub mod topics {
    /// A raw transaction was decoded, recovered and accepted.
    pub const TX_RECEIVED: &str = "ingest.tx_received";
}

/// Event publisher trait for the raw ingestor.
pub trait IngestEventPublisher: Send + Sync {
    /// Publishes `tx.received` (`shared_types::ipc::TxReceivedPayload`).
    fn publish_tx_received(&self, tx_hash: Hash, raw_tx_hash: Hash) -> Result<(), PublishError>;
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

/// No-op publisher for use without a connected event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl IngestEventPublisher for NoOpPublisher {
    fn publish_tx_received(&self, _tx_hash: Hash, _raw_tx_hash: Hash) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Recording publisher for tests.
#[cfg(test)]
pub struct RecordingPublisher {
    pub tx_received: std::sync::Mutex<Vec<(Hash, Hash)>>,
}

#[cfg(test)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            tx_received: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl IngestEventPublisher for RecordingPublisher {
    fn publish_tx_received(&self, tx_hash: Hash, raw_tx_hash: Hash) -> Result<(), PublishError> {
        self.tx_received.lock().unwrap().push((tx_hash, raw_tx_hash));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_op_publisher_always_succeeds() {
        let publisher = NoOpPublisher;
        assert!(publisher.publish_tx_received([1; 32], [2; 32]).is_ok());
    }

    #[test]
    fn recording_publisher_records_tx_received() {
        let publisher = RecordingPublisher::new();
        publisher.publish_tx_received([0xAA; 32], [0xBB; 32]).unwrap();
        let recorded = publisher.tx_received.lock().unwrap();
        assert_eq!(recorded[0], ([0xAA; 32], [0xBB; 32]));
    }
}
