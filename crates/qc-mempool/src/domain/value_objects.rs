//! Value objects for the mempool: ordering keys and aggregate snapshots.

use super::entities::{Hash, Timestamp};
use std::cmp::Ordering;

/// A transaction reference ordered by priority for the eviction/selection
/// queue.
///
/// Higher `priority_score` sorts first; ties broken by earliest
/// `created_at`, then by hash for a fully deterministic order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PricedTransaction {
    /// `fee / gas_limit` (higher = higher priority).
    pub priority_score: u64,
    /// Transaction hash.
    pub hash: Hash,
    /// Acceptance timestamp (earlier = higher priority for ties).
    pub created_at: Timestamp,
}

impl PricedTransaction {
    #[must_use]
    pub fn new(priority_score: u64, hash: Hash, created_at: Timestamp) -> Self {
        Self {
            priority_score,
            hash,
            created_at,
        }
    }
}

impl Ord for PricedTransaction {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority_score
            .cmp(&self.priority_score)
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl PartialOrd for PricedTransaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tracks which transaction hashes were proposed together for a given
/// block height, so a `remove()`/rollback can act on the whole batch.
#[derive(Clone, Debug)]
pub struct PendingInclusionBatch {
    /// Target block height.
    pub block_height: u64,
    /// Timestamp the batch was proposed.
    pub proposed_at: Timestamp,
    /// Transaction hashes in this batch.
    pub transaction_hashes: Vec<Hash>,
}

impl PendingInclusionBatch {
    #[must_use]
    pub fn new(block_height: u64, proposed_at: Timestamp, transaction_hashes: Vec<Hash>) -> Self {
        Self {
            block_height,
            proposed_at,
            transaction_hashes,
        }
    }
}

/// Aggregate mempool statistics, as returned by `stats()`.
#[derive(Clone, Debug, Default)]
pub struct MempoolStats {
    /// Transactions available for selection.
    pub pending_count: usize,
    /// Transactions currently proposed for a not-yet-confirmed block.
    pub pending_inclusion_count: usize,
    /// Sum of gas limits across all entries (entries without a gas limit
    /// count as zero).
    pub total_gas: u64,
    /// Age of the oldest entry, in seconds.
    pub oldest_tx_age_secs: u64,
}

/// Result of proposing a batch of transactions for block inclusion.
#[derive(Clone, Debug, Default)]
pub struct ProposeResult {
    /// Number of transactions successfully moved to `PendingInclusion`.
    pub proposed_count: usize,
    /// Hashes already in `PendingInclusion`.
    pub already_pending: Vec<Hash>,
    /// Hashes not present in the pool.
    pub not_found: Vec<Hash>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priority_orders_first() {
        let low = PricedTransaction::new(1, [1; 32], 1000);
        let high = PricedTransaction::new(2, [2; 32], 1000);
        assert!(high < low);
    }

    #[test]
    fn fifo_tiebreak_on_equal_priority() {
        let earlier = PricedTransaction::new(1, [1; 32], 1000);
        let later = PricedTransaction::new(1, [2; 32], 2000);
        assert!(earlier < later);
    }

    #[test]
    fn hash_is_the_final_tiebreak() {
        let a = PricedTransaction::new(1, [1; 32], 1000);
        let b = PricedTransaction::new(1, [2; 32], 1000);
        assert!(a < b);
    }
}
