//! # Blockchain Event
//!
//! The event enum carried over the bus, one variant per wire payload defined
//! in `shared_types::ipc`. Every subsystem crate that publishes or reacts to
//! cross-crate state changes does so through one of these variants rather
//! than a bespoke message type.

use serde::{Deserialize, Serialize};
use shared_types::ipc::{
    BlockCreatedPayload, CircuitTransitionPayload, HeartbeatPayload, NodeRegisteredPayload,
    PeerListRequestPayload, PeerListResponsePayload, StorageCriticalPayload,
    SyncManualTriggerPayload, SyncRequestPayload, SyncResponsePayload, TxReceivedPayload,
    VerifyBlockRequestPayload, VerifyBlockResponsePayload, VerifySignatureRequestPayload,
    VerifySignatureResponsePayload,
};

/// Every cross-subsystem event the bus carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BlockchainEvent {
    /// A raw transaction was decoded and accepted into the mempool.
    /// Source: `qc-raw-ingestor`.
    TxReceived(TxReceivedPayload),

    /// A block was signed and committed to storage.
    /// Source: `qc-block-builder`.
    BlockCreated(BlockCreatedPayload),

    /// A peer-received block needs verification before `ChainStore::append`.
    /// Source: `qc-event-sync` | Target: `qc-consensus`.
    VerifyBlockRequest {
        /// Correlation id matching the eventual `VerifyBlockResponse`.
        correlation_id: String,
        /// The request payload.
        payload: VerifyBlockRequestPayload,
    },

    /// Response to a `VerifyBlockRequest`.
    VerifyBlockResponse {
        /// Correlation id matching the originating request.
        correlation_id: String,
        /// The response payload.
        payload: VerifyBlockResponsePayload,
    },

    /// A new peer completed registration.
    /// Source: `qc-peer-registry`.
    NodeRegistered(NodeRegisteredPayload),

    /// Request for a list of peers.
    PeerListRequest {
        /// Correlation id matching the eventual response.
        correlation_id: String,
        /// The request payload.
        payload: PeerListRequestPayload,
    },

    /// Response to a `PeerListRequest`.
    PeerListResponse {
        /// Correlation id matching the originating request.
        correlation_id: String,
        /// The response payload.
        payload: PeerListResponsePayload,
    },

    /// Adaptive-interval liveness beacon.
    /// Source: `qc-resilience`.
    Heartbeat(HeartbeatPayload),

    /// Request to synchronize a range of blocks from a peer.
    SyncRequest(SyncRequestPayload),

    /// Response carrying the requested block range.
    SyncResponse(SyncResponsePayload),

    /// The health monitor detected a height gap past the sync threshold.
    /// Source: `qc-resilience`.
    SyncManualTrigger(SyncManualTriggerPayload),

    /// A circuit breaker changed phase.
    /// Source: `qc-resilience`.
    CircuitTransition(CircuitTransitionPayload),

    /// Critical storage error, routed to the dead-letter topic.
    /// Source: `qc-chain-store`.
    StorageCritical(StorageCriticalPayload),

    /// Request to verify an arbitrary signature via `qc-crypto`.
    VerifySignatureRequest {
        /// Correlation id matching the eventual response.
        correlation_id: String,
        /// The request payload.
        payload: VerifySignatureRequestPayload,
    },

    /// Response to a `VerifySignatureRequest`.
    VerifySignatureResponse {
        /// Correlation id matching the originating request.
        correlation_id: String,
        /// The response payload.
        payload: VerifySignatureResponsePayload,
    },
}

impl BlockchainEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::TxReceived(_) => EventTopic::Mempool,
            Self::BlockCreated(_) | Self::VerifyBlockRequest { .. } | Self::VerifyBlockResponse { .. } => {
                EventTopic::BlockBuilder
            }
            Self::NodeRegistered(_) | Self::PeerListRequest { .. } | Self::PeerListResponse { .. } => {
                EventTopic::PeerRegistry
            }
            Self::Heartbeat(_)
            | Self::SyncRequest(_)
            | Self::SyncResponse(_)
            | Self::SyncManualTrigger(_) => EventTopic::EventSync,
            Self::CircuitTransition(_) => EventTopic::Resilience,
            Self::StorageCritical(_) => EventTopic::DeadLetterQueue,
            Self::VerifySignatureRequest { .. } | Self::VerifySignatureResponse { .. } => {
                EventTopic::SignatureVerification
            }
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Mempool admission events.
    Mempool,
    /// Block assembly and verification events.
    BlockBuilder,
    /// Peer registry events.
    PeerRegistry,
    /// Event sync fan-out, heartbeat and catch-up sync events.
    EventSync,
    /// Circuit breaker transitions.
    Resilience,
    /// Signature verification request/response.
    SignatureVerification,
    /// Dead Letter Queue for critical errors.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &BlockchainEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&EventTopic::All) || self.topics.contains(&event.topic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::entities::ZERO_HASH;
    use shared_types::ipc::{StorageCriticalError, TxReceivedPayload};

    fn tx_received_event() -> BlockchainEvent {
        BlockchainEvent::TxReceived(TxReceivedPayload {
            tx: sample_tx(),
            raw_tx_hash: ZERO_HASH,
        })
    }

    fn sample_tx() -> shared_types::entities::Transaction {
        shared_types::entities::Transaction {
            from: [0u8; 20],
            to: None,
            amount: 0,
            fee: 0,
            nonce: 0,
            gas_limit: None,
            gas_price: None,
            data: vec![],
            signature: [0u8; 65],
            hash: ZERO_HASH,
        }
    }

    #[test]
    fn test_event_topic_mapping() {
        let event = tx_received_event();
        assert_eq!(event.topic(), EventTopic::Mempool);
    }

    #[test]
    fn test_filter_all() {
        let filter = EventFilter::all();
        assert!(filter.matches(&tx_received_event()));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Mempool]);
        assert!(filter.matches(&tx_received_event()));

        let storage_event = BlockchainEvent::StorageCritical(StorageCriticalPayload {
            error_type: StorageCriticalError::DiskFull,
            block_hash: None,
            description: "low disk".to_string(),
        });
        assert!(!filter.matches(&storage_event));
    }

    #[test]
    fn test_dead_letter_topic() {
        let event = BlockchainEvent::StorageCritical(StorageCriticalPayload {
            error_type: StorageCriticalError::DataCorruption,
            block_hash: Some(ZERO_HASH),
            description: "checksum mismatch".to_string(),
        });
        assert_eq!(event.topic(), EventTopic::DeadLetterQueue);
    }
}
