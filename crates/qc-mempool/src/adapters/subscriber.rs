//! Event subscriber adapter for the mempool subsystem.
//!
//! Subscribes to events from the shared bus for Two-Phase Commit handling.

use crate::ipc::payloads::{BlockRejectedNotification, BlockStorageConfirmation};
use shared_types::Transaction;

/// Topics that the mempool subscribes to.
pub mod topics {
    /// Topic for storage confirmations (from chain store).
    pub const BLOCK_STORAGE_CONFIRMATION: &str = "storage.block_confirmed";
    /// Topic for block rejection notifications (from consensus).
    pub const BLOCK_REJECTED: &str = "consensus.block_rejected";
    /// Topic for raw-ingested, signature-verified transactions.
    pub const ADD_TRANSACTION: &str = "ingest.transaction_verified";
}

/// Event subscriber trait for the mempool.
///
/// Implementations connect to the actual event bus.
pub trait MempoolEventSubscriber: Send + Sync {
    /// Phase 2a of the Two-Phase Commit protocol: block was stored.
    fn on_storage_confirmation(&mut self, confirmation: BlockStorageConfirmation);

    /// Phase 2b of the Two-Phase Commit protocol: block was rejected.
    fn on_block_rejected(&mut self, notification: BlockRejectedNotification);

    /// A verified transaction arrived from the raw ingestor.
    fn on_transaction_verified(&mut self, tx: Transaction);
}

/// Subscription handle for managing event subscriptions.
pub struct SubscriptionHandle {
    /// Unique identifier for this subscription.
    pub id: uuid::Uuid,
    /// Topic being subscribed to.
    pub topic: String,
}

impl SubscriptionHandle {
    /// Creates a new subscription handle.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            topic: topic.into(),
        }
    }
}

/// Event types that can be received by the mempool.
#[derive(Debug, Clone)]
pub enum MempoolEvent {
    /// Storage confirmation received.
    StorageConfirmation(BlockStorageConfirmation),
    /// Block rejected notification received.
    BlockRejected(BlockRejectedNotification),
    /// A verified transaction received from the raw ingestor.
    TransactionVerified(Transaction),
}

/// No-op subscriber for use without a connected event bus.
#[derive(Debug, Default)]
pub struct NoOpSubscriber;

impl MempoolEventSubscriber for NoOpSubscriber {
    fn on_storage_confirmation(&mut self, _confirmation: BlockStorageConfirmation) {}
    fn on_block_rejected(&mut self, _notification: BlockRejectedNotification) {}
    fn on_transaction_verified(&mut self, _tx: Transaction) {}
}

/// Recording subscriber for tests.
#[cfg(test)]
pub struct RecordingSubscriber {
    pub confirmations: Vec<BlockStorageConfirmation>,
    pub rejections: Vec<BlockRejectedNotification>,
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
impl RecordingSubscriber {
    pub fn new() -> Self {
        Self {
            confirmations: Vec::new(),
            rejections: Vec::new(),
            transactions: Vec::new(),
        }
    }
}

#[cfg(test)]
impl MempoolEventSubscriber for RecordingSubscriber {
    fn on_storage_confirmation(&mut self, confirmation: BlockStorageConfirmation) {
        self.confirmations.push(confirmation);
    }

    fn on_block_rejected(&mut self, notification: BlockRejectedNotification) {
        self.rejections.push(notification);
    }

    fn on_transaction_verified(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::payloads::BlockRejectionReason;
    use uuid::Uuid;

    fn test_tx() -> Transaction {
        Transaction {
            from: [0xBB; 20],
            to: Some([0xCC; 20]),
            amount: 1_000_000,
            fee: 21_000,
            nonce: 5,
            gas_limit: Some(21_000),
            gas_price: None,
            data: vec![],
            signature: [0u8; 65],
            hash: [0xAB; 32],
        }
    }

    #[test]
    fn subscription_handle_carries_topic() {
        let handle = SubscriptionHandle::new("test.topic");
        assert_eq!(handle.topic, "test.topic");
    }

    #[test]
    fn recording_subscriber_records_confirmations() {
        let mut subscriber = RecordingSubscriber::new();

        let confirmation = BlockStorageConfirmation {
            correlation_id: Uuid::new_v4(),
            block_hash: [0xAA; 32],
            block_height: 1,
            included_transactions: vec![[0xBB; 32]],
            storage_timestamp: 1000,
        };

        subscriber.on_storage_confirmation(confirmation);

        assert_eq!(subscriber.confirmations.len(), 1);
        assert_eq!(subscriber.confirmations[0].block_height, 1);
    }

    #[test]
    fn recording_subscriber_records_rejections() {
        let mut subscriber = RecordingSubscriber::new();

        let notification = BlockRejectedNotification {
            correlation_id: Uuid::new_v4(),
            block_hash: [0xAA; 32],
            block_height: 1,
            affected_transactions: vec![[0xBB; 32]],
            rejection_reason: BlockRejectionReason::ConsensusRejected,
        };

        subscriber.on_block_rejected(notification);

        assert_eq!(subscriber.rejections.len(), 1);
        assert_eq!(
            subscriber.rejections[0].rejection_reason,
            BlockRejectionReason::ConsensusRejected
        );
    }

    #[test]
    fn recording_subscriber_records_verified_transactions() {
        let mut subscriber = RecordingSubscriber::new();
        subscriber.on_transaction_verified(test_tx());
        assert_eq!(subscriber.transactions.len(), 1);
        assert_eq!(subscriber.transactions[0].nonce, 5);
    }
}
