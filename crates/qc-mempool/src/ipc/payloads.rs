//! # IPC Message Payloads
//!
//! Request/response types for inter-subsystem communication. All payloads
//! are wrapped in `AuthenticatedMessage<T>` for intra-process dispatch.

use crate::domain::{Hash, MempoolStats};
use serde::{Deserialize, Serialize};
use shared_types::Transaction;
use uuid::Uuid;

/// Request to add a raw-ingested, signature-verified transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTransactionRequest {
    /// Correlation ID for request tracking.
    pub correlation_id: Uuid,
    /// The transaction, already signature-verified by the raw ingestor.
    pub transaction: Transaction,
}

/// Response to `AddTransactionRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTransactionResponse {
    /// Correlation ID matching the request.
    pub correlation_id: Uuid,
    /// Whether the transaction was accepted.
    pub accepted: bool,
    /// The transaction hash if accepted.
    pub tx_hash: Option<Hash>,
    /// Error message if rejected.
    pub error: Option<String>,
}

/// Request for a batch of transactions to build a block from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBatchRequest {
    /// Correlation ID for request tracking.
    pub correlation_id: Uuid,
    /// Maximum number of transactions to return.
    pub max_count: u32,
    /// Target block height, for logging/tracing only.
    pub target_block_height: u64,
}

/// Response containing a priority-ordered transaction batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBatchResponse {
    /// Correlation ID matching the request.
    pub correlation_id: Uuid,
    /// Transaction hashes in priority order.
    pub tx_hashes: Vec<Hash>,
}

/// Confirmation that transactions were stored in a block (Two-Phase
/// Commit, phase 2a — success path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockStorageConfirmation {
    /// Correlation ID for tracking.
    pub correlation_id: Uuid,
    /// The stored block hash.
    pub block_hash: Hash,
    /// The stored block height.
    pub block_height: u64,
    /// Transaction hashes that were included.
    pub included_transactions: Vec<Hash>,
    /// Timestamp when stored.
    pub storage_timestamp: u64,
}

/// Notification that a proposed block was rejected (Two-Phase Commit,
/// phase 2b — failure path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRejectedNotification {
    /// Correlation ID for tracking.
    pub correlation_id: Uuid,
    /// The rejected block hash.
    pub block_hash: Hash,
    /// The rejected block height.
    pub block_height: u64,
    /// Transaction hashes that should be rolled back.
    pub affected_transactions: Vec<Hash>,
    /// Reason for rejection.
    pub rejection_reason: BlockRejectionReason,
}

/// Reasons for block rejection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlockRejectionReason {
    /// Consensus rejected the block (e.g. wrong leader, bad signature).
    ConsensusRejected,
    /// `ChainStore::append` failed (a conflicting block won the race).
    AppendConflict,
    /// Proposal timed out.
    Timeout,
}

/// Request to remove confirmed or invalidated transactions from the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTransactionsRequest {
    /// Correlation ID for request tracking.
    pub correlation_id: Uuid,
    /// Transaction hashes to remove.
    pub tx_hashes: Vec<Hash>,
}

/// Response to `RemoveTransactionsRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTransactionsResponse {
    /// Correlation ID matching the request.
    pub correlation_id: Uuid,
    /// Number of transactions removed.
    pub removed_count: usize,
    /// Hashes of removed transactions.
    pub removed: Vec<Hash>,
}

/// Request for mempool status (`stats()`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStatusRequest {
    /// Correlation ID for request tracking.
    pub correlation_id: Uuid,
}

/// Response containing mempool status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStatusResponse {
    /// Correlation ID matching the request.
    pub correlation_id: Uuid,
    /// Current mempool status.
    pub status: MempoolStatusPayload,
}

/// Mempool status for IPC/API consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MempoolStatusPayload {
    /// Number of pending transactions.
    pub pending_count: u32,
    /// Number of transactions pending inclusion.
    pub pending_inclusion_count: u32,
    /// Total gas in the pool.
    pub total_gas: u64,
    /// Age of the oldest entry, in seconds.
    pub oldest_tx_age_secs: u64,
}

impl From<MempoolStats> for MempoolStatusPayload {
    fn from(s: MempoolStats) -> Self {
        Self {
            pending_count: s.pending_count as u32,
            pending_inclusion_count: s.pending_inclusion_count as u32,
            total_gas: s.total_gas,
            oldest_tx_age_secs: s.oldest_tx_age_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_tx() -> Transaction {
        Transaction {
            from: [0xBB; 20],
            to: Some([0xCC; 20]),
            amount: 1_000_000,
            fee: 21_000,
            nonce: 5,
            gas_limit: Some(21_000),
            gas_price: None,
            data: vec![1, 2, 3],
            signature: [0u8; 65],
            hash: [0xAB; 32],
        }
    }

    #[test]
    fn add_transaction_request_round_trips() {
        let req = AddTransactionRequest {
            correlation_id: Uuid::new_v4(),
            transaction: test_tx(),
        };
        let json = serde_json::to_string(&req).unwrap();
        let decoded: AddTransactionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.transaction.nonce, 5);
    }

    #[test]
    fn block_rejection_reason_serializes() {
        let reason = BlockRejectionReason::ConsensusRejected;
        let json = serde_json::to_string(&reason).unwrap();
        assert!(json.contains("ConsensusRejected"));
    }
}
