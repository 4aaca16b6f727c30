//! Event publisher adapter for the mempool subsystem.
//!
//! Publishes events onto the shared bus for choreography with
//! `qc-event-sync` (broadcast), `qc-block-builder` (batch proposals) and
//! any external status observers.

use crate::domain::Hash;
use crate::ipc::payloads::MempoolStatusPayload;
use uuid::Uuid;

/// Topics published by the mempool.
pub mod topics {
    /// A newly accepted transaction, for gossip to peers.
    pub const TX_RECEIVED: &str = "mempool.tx_received";
    /// A transaction batch proposed for block inclusion.
    pub const PROPOSE_TRANSACTION_BATCH: &str = "mempool.propose_batch";
    /// Periodic mempool status snapshot.
    pub const MEMPOOL_STATUS: &str = "mempool.status";
}

/// Event publisher trait for the mempool.
pub trait MempoolEventPublisher: Send + Sync {
    /// Publishes a newly accepted transaction (`tx.received`).
    fn publish_tx_received(&self, tx_hash: Hash, raw_tx_hash: Hash) -> Result<(), PublishError>;

    /// Publishes a transaction batch proposal to the block builder/consensus.
    fn publish_propose_batch(
        &self,
        correlation_id: Uuid,
        tx_hashes: Vec<Hash>,
        total_gas: u64,
        target_block_height: u64,
    ) -> Result<(), PublishError>;

    /// Publishes a mempool status snapshot.
    fn publish_status(&self, status: MempoolStatusPayload) -> Result<(), PublishError>;
}

/// Error type for publish operations.
#[derive(Debug, Clone)]
pub enum PublishError {
    /// The event bus is not connected.
    NotConnected,
    /// Failed to serialize the message.
    SerializationError(String),
    /// The topic does not exist.
    TopicNotFound(String),
    /// Internal error.
    Internal(String),
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "event bus not connected"),
            Self::SerializationError(e) => write!(f, "serialization error: {e}"),
            Self::TopicNotFound(t) => write!(f, "topic not found: {t}"),
            Self::Internal(e) => write!(f, "internal error: {e}"),
        }
    }
}

impl std::error::Error for PublishError {}

/// No-op publisher for use without a connected event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl MempoolEventPublisher for NoOpPublisher {
    fn publish_tx_received(&self, _tx_hash: Hash, _raw_tx_hash: Hash) -> Result<(), PublishError> {
        Ok(())
    }

    fn publish_propose_batch(
        &self,
        _correlation_id: Uuid,
        _tx_hashes: Vec<Hash>,
        _total_gas: u64,
        _target_block_height: u64,
    ) -> Result<(), PublishError> {
        Ok(())
    }

    fn publish_status(&self, _status: MempoolStatusPayload) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Recording publisher for tests.
#[cfg(test)]
pub struct RecordingPublisher {
    pub tx_received: std::sync::Mutex<Vec<(Hash, Hash)>>,
    pub batches: std::sync::Mutex<Vec<(Uuid, Vec<Hash>, u64, u64)>>,
    pub statuses: std::sync::Mutex<Vec<MempoolStatusPayload>>,
}

#[cfg(test)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            tx_received: std::sync::Mutex::new(Vec::new()),
            batches: std::sync::Mutex::new(Vec::new()),
            statuses: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl MempoolEventPublisher for RecordingPublisher {
    fn publish_tx_received(&self, tx_hash: Hash, raw_tx_hash: Hash) -> Result<(), PublishError> {
        self.tx_received.lock().unwrap().push((tx_hash, raw_tx_hash));
        Ok(())
    }

    fn publish_propose_batch(
        &self,
        correlation_id: Uuid,
        tx_hashes: Vec<Hash>,
        total_gas: u64,
        target_block_height: u64,
    ) -> Result<(), PublishError> {
        self.batches
            .lock()
            .unwrap()
            .push((correlation_id, tx_hashes, total_gas, target_block_height));
        Ok(())
    }

    fn publish_status(&self, status: MempoolStatusPayload) -> Result<(), PublishError> {
        self.statuses.lock().unwrap().push(status);
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
        assert!(publisher
            .publish_propose_batch(Uuid::new_v4(), vec![], 0, 0)
            .is_ok());
    }

    #[test]
    fn recording_publisher_records_batches() {
        let publisher = RecordingPublisher::new();
        let id = Uuid::new_v4();
        let hashes = vec![[0xAA; 32], [0xBB; 32]];

        publisher
            .publish_propose_batch(id, hashes.clone(), 42_000, 1)
            .unwrap();

        let batches = publisher.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].1, hashes);
    }
}
