//! # Inbound Port — MempoolApi
//!
//! Primary driving port exposing the transaction pool to the rest of the
//! node: the raw ingestor (adds), the block builder (batches/confirms),
//! and consensus (rollback on a rejected proposal).

use crate::domain::{
    Hash, MempoolError, MempoolStats, PooledTransaction, ProposeResult, Transaction,
    TransactionState,
};

/// Primary API for the mempool subsystem.
pub trait MempoolApi: Send + Sync {
    /// `addTransaction(tx)`.
    ///
    /// # Errors
    /// - `DuplicateTx`: hash already present
    /// - `InsufficientFee`: below the current minimum fee
    /// - `NonceInPast`: not greater than the sender's last confirmed nonce
    /// - `MempoolFull`: at capacity and the transaction doesn't strictly
    ///   outrank the current lowest-priority entry
    fn add_transaction(&mut self, tx: Transaction) -> Result<Hash, MempoolError>;

    /// `getBatch(n)`: highest priority first, nonce-monotonic per sender.
    fn get_batch(&self, max_count: usize) -> Vec<PooledTransaction>;

    /// Proposes a batch for inclusion at `block_height` (Two-Phase Commit,
    /// phase one). Entries move to `PendingInclusion` but are not deleted.
    fn propose_transactions(&mut self, tx_hashes: &[Hash], block_height: u64) -> ProposeResult;

    /// `remove(hashes)`: confirms inclusion, permanently deleting entries.
    fn remove(&mut self, tx_hashes: &[Hash]) -> Vec<Hash>;

    /// Rolls back proposed transactions to `Pending` (Two-Phase Commit,
    /// phase two failure path).
    fn rollback_proposal(&mut self, tx_hashes: &[Hash]) -> Vec<Hash>;

    /// `expire(olderThan)`: drops `Pending` entries whose TTL has lapsed.
    fn expire(&mut self, now: u64) -> Vec<Hash>;

    /// Looks up a transaction by hash.
    fn get_transaction(&self, hash: &Hash) -> Option<PooledTransaction>;

    /// Looks up the Two-Phase Commit state of a transaction.
    fn get_transaction_state(&self, hash: &Hash) -> Option<TransactionState>;

    fn contains(&self, hash: &Hash) -> bool;

    /// Rolls back any `PendingInclusion` entries that outlived the
    /// assembly timeout. Intended to be called periodically.
    fn cleanup_timeouts(&mut self) -> Vec<Hash>;

    /// `size()`.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool;

    /// `stats()`.
    fn stats(&self) -> MempoolStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn MempoolApi) {}
}
