//! # Transaction Pool — priority queue and Two-Phase Commit
//!
//! ## Data Structures
//!
//! - `by_hash`: O(1) lookup by transaction hash.
//! - `by_priority`: O(log n) priority queue (`BTreeSet`), pending entries only.
//! - `by_sender`: O(log n) nonce-ordered transactions per account.
//!
//! ## Invariants Enforced
//!
//! - No duplicate hashes (checked in `add_transaction`).
//! - Nonce ordering per sender (`BTreeMap` keys).
//! - `PendingInclusion` entries are excluded from `get_batch`.
//! - Proposals that sit in `PendingInclusion` past the assembly timeout are
//!   auto-rolled back (`cleanup_timeouts`).

use super::entities::{
    priority_score, Address, Hash, MempoolConfig, PooledTransaction, Timestamp, Transaction,
    TransactionState,
};
use super::errors::MempoolError;
use super::value_objects::{MempoolStats, PendingInclusionBatch, PricedTransaction, ProposeResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Transaction priority queue with hash/sender/priority indices.
#[derive(Debug)]
pub struct TransactionPool {
    config: MempoolConfig,
    by_hash: HashMap<Hash, PooledTransaction>,
    /// Only holds `Pending` entries.
    by_priority: BTreeSet<PricedTransaction>,
    by_sender: HashMap<Address, BTreeMap<u64, Hash>>,
    /// Highest nonce confirmed into a block, per sender.
    confirmed_nonce: HashMap<Address, u64>,
    pending_batches: Vec<PendingInclusionBatch>,
}

impl TransactionPool {
    #[must_use]
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            config,
            by_hash: HashMap::new(),
            by_priority: BTreeSet::new(),
            by_sender: HashMap::new(),
            confirmed_nonce: HashMap::new(),
            pending_batches: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(MempoolConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &MempoolConfig {
        &self.config
    }

    /// Total number of entries, pending or pending-inclusion (`size()`).
    #[must_use]
    pub fn size(&self) -> usize {
        self.by_hash.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.by_priority.len()
    }

    #[must_use]
    pub fn pending_inclusion_count(&self) -> usize {
        self.by_hash.len() - self.by_priority.len()
    }

    #[must_use]
    pub fn get(&self, hash: &Hash) -> Option<&PooledTransaction> {
        self.by_hash.get(hash)
    }

    #[must_use]
    pub fn contains(&self, hash: &Hash) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Records the last confirmed nonce for a sender, seeding the
    /// `NonceInPast` check. Called at startup and whenever the chain
    /// advances with transactions from this sender.
    pub fn set_confirmed_nonce(&mut self, sender: Address, nonce: u64) {
        let entry = self.confirmed_nonce.entry(sender).or_insert(0);
        if nonce > *entry {
            *entry = nonce;
        }
    }

    fn last_confirmed_nonce(&self, sender: &Address) -> u64 {
        self.confirmed_nonce.get(sender).copied().unwrap_or(0)
    }

    /// `addTransaction(tx)`.
    ///
    /// Preconditions: `tx.fee >= minFee`; `tx.nonce > lastConfirmedNonce`;
    /// current size below capacity (or the tx strictly outranks the lowest
    /// priority entry present).
    pub fn add_transaction(&mut self, tx: Transaction, now: Timestamp) -> Result<(), MempoolError> {
        if self.by_hash.contains_key(&tx.hash) {
            tracing::debug!(hash = ?tx.hash, "rejecting duplicate transaction");
            return Err(MempoolError::DuplicateTx(tx.hash));
        }

        if tx.fee < self.config.min_fee {
            tracing::debug!(fee = tx.fee, minimum = self.config.min_fee, "fee below minimum");
            return Err(MempoolError::InsufficientFee {
                fee: tx.fee,
                minimum: self.config.min_fee,
            });
        }

        let last_confirmed = self.last_confirmed_nonce(&tx.from);
        if tx.nonce <= last_confirmed && last_confirmed > 0 {
            return Err(MempoolError::NonceInPast {
                nonce: tx.nonce,
                last_confirmed,
            });
        }

        let sender_count = self.by_sender.get(&tx.from).map(BTreeMap::len).unwrap_or(0);
        if sender_count >= self.config.max_per_account {
            return self.try_rbf_at_limit(tx, now);
        }

        if self.by_hash.len() >= self.config.max_transactions {
            let pooled = self.build_pooled(tx, now);
            if !self.try_evict_for(&pooled)? {
                tracing::warn!(capacity = self.config.max_transactions, "mempool full, rejecting transaction");
                return Err(MempoolError::MempoolFull {
                    capacity: self.config.max_transactions,
                });
            }
            return self.try_rbf_or_add(pooled);
        }

        let pooled = self.build_pooled(tx, now);
        self.try_rbf_or_add(pooled)
    }

    fn build_pooled(&self, tx: Transaction, now: Timestamp) -> PooledTransaction {
        let score = priority_score(&tx);
        PooledTransaction::new(tx, score, now, self.config.ttl_secs)
    }

    fn try_rbf_at_limit(
        &mut self,
        tx: Transaction,
        now: Timestamp,
    ) -> Result<(), MempoolError> {
        if !self.config.enable_rbf {
            return Err(MempoolError::AccountLimitReached {
                address: tx.from,
                limit: self.config.max_per_account,
            });
        }

        let existing_hash = self
            .by_sender
            .get(&tx.from)
            .and_then(|m| m.get(&tx.nonce))
            .copied();

        if let Some(hash) = existing_hash {
            let existing = self.by_hash.get(&hash).unwrap();
            let candidate = self.build_pooled(tx, now);
            if self.can_replace(existing, &candidate)? {
                self.remove_internal(&hash);
                return self.add_internal(candidate);
            }
        }

        Err(MempoolError::AccountLimitReached {
            address: tx.from,
            limit: self.config.max_per_account,
        })
    }

    fn try_rbf_or_add(&mut self, pooled: PooledTransaction) -> Result<(), MempoolError> {
        let sender = pooled.sender();
        let nonce = pooled.entry.tx.nonce;
        let existing_hash = self
            .by_sender
            .get(&sender)
            .and_then(|m| m.get(&nonce))
            .copied();

        let Some(hash) = existing_hash else {
            return self.add_internal(pooled);
        };

        if !self.config.enable_rbf {
            return Err(MempoolError::RbfDisabled);
        }

        let existing = self.by_hash.get(&hash).unwrap();
        if !self.can_replace(existing, &pooled)? {
            return Err(MempoolError::InsufficientFeeBump {
                old_fee: existing.entry.tx.fee,
                new_fee: pooled.entry.tx.fee,
                min_bump_percent: self.config.rbf_min_bump_percent,
            });
        }

        self.remove_internal(&hash);
        self.add_internal(pooled)
    }

    fn add_internal(&mut self, pooled: PooledTransaction) -> Result<(), MempoolError> {
        let hash = pooled.hash();
        let sender = pooled.sender();
        let nonce = pooled.entry.tx.nonce;

        if pooled.is_pending() {
            self.by_priority.insert(PricedTransaction::new(
                pooled.entry.priority_score,
                hash,
                pooled.entry.created_at,
            ));
        }

        self.by_sender.entry(sender).or_default().insert(nonce, hash);
        self.by_hash.insert(hash, pooled);
        Ok(())
    }

    fn can_replace(
        &self,
        existing: &PooledTransaction,
        candidate: &PooledTransaction,
    ) -> Result<bool, MempoolError> {
        if existing.is_pending_inclusion() {
            return Err(MempoolError::TransactionPendingInclusion(existing.hash()));
        }
        if existing.sender() != candidate.sender() || existing.entry.tx.nonce != candidate.entry.tx.nonce {
            return Ok(false);
        }
        let min_new_fee =
            existing.entry.tx.fee * (100 + self.config.rbf_min_bump_percent) / 100;
        Ok(candidate.entry.tx.fee >= min_new_fee)
    }

    /// Evicts the current lowest-priority pending entry, if the incoming
    /// transaction strictly exceeds its priority.
    fn try_evict_for(&mut self, new_tx: &PooledTransaction) -> Result<bool, MempoolError> {
        let lowest = match self.by_priority.iter().next_back() {
            Some(p) => p.clone(),
            None => return Ok(false),
        };
        let lowest_tx = match self.by_hash.get(&lowest.hash) {
            Some(tx) => tx,
            None => return Ok(false),
        };

        let strictly_higher = new_tx.entry.priority_score > lowest_tx.entry.priority_score
            || (new_tx.entry.priority_score == lowest_tx.entry.priority_score
                && new_tx.entry.created_at < lowest_tx.entry.created_at);

        if !strictly_higher {
            return Ok(false);
        }

        self.remove_internal(&lowest.hash);
        Ok(true)
    }

    fn remove_internal(&mut self, hash: &Hash) -> Option<PooledTransaction> {
        let tx = self.by_hash.remove(hash)?;

        self.by_priority.remove(&PricedTransaction::new(
            tx.entry.priority_score,
            tx.hash(),
            tx.entry.created_at,
        ));

        if let Some(sender_txs) = self.by_sender.get_mut(&tx.sender()) {
            sender_txs.remove(&tx.entry.tx.nonce);
            if sender_txs.is_empty() {
                self.by_sender.remove(&tx.sender());
            }
        }

        Some(tx)
    }

    /// `getBatch(n)`: highest priority first, ties broken by `created_at`,
    /// enforcing per-sender nonce monotonicity within the batch.
    #[must_use]
    pub fn get_batch(&self, max_count: usize) -> Vec<&PooledTransaction> {
        let mut result = Vec::new();
        let mut sender_next_nonce: HashMap<Address, u64> = HashMap::new();

        for priced in &self.by_priority {
            if result.len() >= max_count {
                break;
            }
            let Some(tx) = self.by_hash.get(&priced.hash) else {
                continue;
            };

            let expected_nonce = sender_next_nonce
                .get(&tx.sender())
                .copied()
                .unwrap_or_else(|| {
                    self.by_sender
                        .get(&tx.sender())
                        .and_then(|m| m.keys().next().copied())
                        .unwrap_or(tx.entry.tx.nonce)
                });

            if tx.entry.tx.nonce != expected_nonce {
                continue;
            }

            result.push(tx);
            sender_next_nonce.insert(tx.sender(), tx.entry.tx.nonce + 1);
        }

        result
    }

    /// Proposes a batch of hashes for inclusion in `block_height` (first
    /// half of Two-Phase Commit). Entries remain in the pool, moved to
    /// `PendingInclusion`.
    pub fn propose(&mut self, hashes: &[Hash], block_height: u64, now: Timestamp) -> ProposeResult {
        let mut result = ProposeResult::default();
        let mut proposed = Vec::new();

        for hash in hashes {
            let Some(tx) = self.by_hash.get_mut(hash) else {
                result.not_found.push(*hash);
                continue;
            };
            if tx.is_pending_inclusion() {
                result.already_pending.push(*hash);
                continue;
            }

            self.by_priority.remove(&PricedTransaction::new(
                tx.entry.priority_score,
                tx.hash(),
                tx.entry.created_at,
            ));
            let _ = tx.propose(block_height, now);
            result.proposed_count += 1;
            proposed.push(*hash);
        }

        if !proposed.is_empty() {
            self.pending_batches
                .push(PendingInclusionBatch::new(block_height, now, proposed));
        }

        result
    }

    /// `remove(hashes)`: confirms inclusion, permanently deleting the
    /// entries and advancing `confirmed_nonce` for their senders.
    pub fn remove(&mut self, hashes: &[Hash]) -> Vec<Hash> {
        let mut removed = Vec::new();
        for hash in hashes {
            if let Some(tx) = self.remove_internal(hash) {
                self.set_confirmed_nonce(tx.sender(), tx.entry.tx.nonce);
                removed.push(tx.hash());
            }
        }

        let removed_set: std::collections::HashSet<_> = removed.iter().collect();
        self.pending_batches
            .retain(|b| !b.transaction_hashes.iter().all(|h| removed_set.contains(h)));

        removed
    }

    /// Rolls proposed-but-unconfirmed transactions back to `Pending`.
    pub fn rollback(&mut self, hashes: &[Hash]) -> Vec<Hash> {
        let mut rolled_back = Vec::new();

        for hash in hashes {
            let Some(tx) = self.by_hash.get_mut(hash) else {
                continue;
            };
            if !tx.is_pending_inclusion() {
                continue;
            }
            self.by_priority.insert(PricedTransaction::new(
                tx.entry.priority_score,
                tx.hash(),
                tx.entry.created_at,
            ));
            let _ = tx.rollback();
            rolled_back.push(*hash);
        }

        self.pending_batches
            .retain(|b| !b.transaction_hashes.iter().any(|h| hashes.contains(h)));

        rolled_back
    }

    /// Auto-rollback of `PendingInclusion` entries that outlived the
    /// assembly timeout.
    pub fn cleanup_timeouts(&mut self, now: Timestamp) -> Vec<Hash> {
        let timeout = self.config.pending_inclusion_timeout_secs;
        let timed_out: Vec<Hash> = self
            .by_hash
            .values()
            .filter(|tx| tx.is_timed_out(now, timeout))
            .map(PooledTransaction::hash)
            .collect();
        if !timed_out.is_empty() {
            tracing::debug!(count = timed_out.len(), "rolling back timed-out proposals");
        }
        self.rollback(&timed_out)
    }

    /// `expire(olderThan)`: drops `Pending` entries whose TTL has lapsed.
    /// `PendingInclusion` entries are left for the commit protocol to
    /// resolve via `cleanup_timeouts`.
    pub fn expire(&mut self, now: Timestamp) -> Vec<Hash> {
        let expired: Vec<Hash> = self
            .by_hash
            .values()
            .filter(|tx| tx.is_pending() && tx.is_expired(now))
            .map(PooledTransaction::hash)
            .collect();

        for hash in &expired {
            self.remove_internal(hash);
        }

        expired
    }

    #[must_use]
    pub fn sender_count(&self, sender: &Address) -> usize {
        self.by_sender.get(sender).map(BTreeMap::len).unwrap_or(0)
    }

    /// `stats()`.
    #[must_use]
    pub fn stats(&self, now: Timestamp) -> MempoolStats {
        let oldest_age = self
            .by_hash
            .values()
            .map(|tx| now.saturating_sub(tx.entry.created_at))
            .max()
            .unwrap_or(0);

        let total_gas: u64 = self
            .by_hash
            .values()
            .map(|tx| tx.entry.tx.gas_limit.unwrap_or(0))
            .sum();

        MempoolStats {
            pending_count: self.pending_count(),
            pending_inclusion_count: self.pending_inclusion_count(),
            total_gas,
            oldest_tx_age_secs: oldest_age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(sender: u8, nonce: u64, fee: u64) -> Transaction {
        let hash_seed = (u32::from(sender) << 8) | nonce as u32;
        let mut hash = [0u8; 32];
        hash[28..].copy_from_slice(&hash_seed.to_be_bytes());
        Transaction {
            from: [sender; 20],
            to: Some([0xBB; 20]),
            amount: 0,
            fee,
            nonce,
            gas_limit: Some(21_000),
            gas_price: None,
            data: vec![],
            signature: [0u8; 65],
            hash,
        }
    }

    #[test]
    fn propose_confirm_removes_transaction() {
        let mut pool = TransactionPool::with_defaults();
        let t = tx(0xAA, 1, 21_000);
        let hash = t.hash;
        pool.add_transaction(t, 1000).unwrap();

        pool.propose(&[hash], 1, 2000);
        assert!(pool.get(&hash).unwrap().is_pending_inclusion());

        let removed = pool.remove(&[hash]);
        assert_eq!(removed, vec![hash]);
        assert!(!pool.contains(&hash));
    }

    #[test]
    fn rollback_restores_pending() {
        let mut pool = TransactionPool::with_defaults();
        let t = tx(0xAA, 1, 21_000);
        let hash = t.hash;
        pool.add_transaction(t, 1000).unwrap();
        pool.propose(&[hash], 1, 2000);

        let rolled_back = pool.rollback(&[hash]);
        assert_eq!(rolled_back, vec![hash]);
        assert!(pool.get(&hash).unwrap().is_pending());
    }

    #[test]
    fn priority_packing_orders_by_score_then_nonce() {
        let mut pool = TransactionPool::with_defaults();
        // A{fee=21000,gas=21000,nonce=0} -> score 1
        // B{fee=10500,gas=21000,nonce=1} -> score 0 (same sender as A)
        // C{fee=42000,gas=21000,nonce=0} -> score 2 (different sender)
        let a = tx(0xAA, 0, 21_000);
        let b = tx(0xAA, 1, 10_500);
        let c = tx(0xCC, 0, 42_000);
        let (ha, hb, hc) = (a.hash, b.hash, c.hash);

        pool.add_transaction(a, 1000).unwrap();
        pool.add_transaction(b, 1000).unwrap();
        pool.add_transaction(c, 1000).unwrap();

        let batch: Vec<Hash> = pool.get_batch(3).iter().map(|t| t.hash()).collect();
        assert_eq!(batch, vec![hc, ha, hb]);
    }

    #[test]
    fn nonce_gap_excludes_higher_nonce() {
        let mut pool = TransactionPool::with_defaults();
        let t0 = tx(0xAA, 0, 1000);
        let t2 = tx(0xAA, 2, 2000);
        pool.add_transaction(t0.clone(), 1000).unwrap();
        pool.add_transaction(t2, 1000).unwrap();

        let batch = pool.get_batch(10);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].entry.tx.nonce, 0);
    }

    #[test]
    fn replace_by_fee_requires_minimum_bump() {
        let mut pool = TransactionPool::with_defaults();
        let t1 = tx(0xAA, 0, 1_000_000);
        let hash1 = t1.hash;
        pool.add_transaction(t1, 1000).unwrap();

        let t2 = tx(0xAA, 0, 1_050_000);
        let err = pool.add_transaction(t2, 1000).unwrap_err();
        assert!(matches!(err, MempoolError::InsufficientFeeBump { .. }));
        assert!(pool.contains(&hash1));
    }

    #[test]
    fn eviction_requires_strictly_higher_priority() {
        let config = MempoolConfig {
            max_transactions: 2,
            ..MempoolConfig::default()
        };
        let mut pool = TransactionPool::new(config);
        let low = tx(0xAA, 0, 1000);
        let mid = tx(0xBB, 0, 2000);
        let hash_low = low.hash;

        pool.add_transaction(low, 1000).unwrap();
        pool.add_transaction(mid, 1000).unwrap();

        let higher = tx(0xCC, 0, 3000);
        let hash_higher = higher.hash;
        pool.add_transaction(higher, 1000).unwrap();

        assert_eq!(pool.size(), 2);
        assert!(!pool.contains(&hash_low));
        assert!(pool.contains(&hash_higher));
    }

    #[test]
    fn expire_drops_only_pending_past_ttl() {
        let mut pool = TransactionPool::with_defaults();
        let t = tx(0xAA, 0, 1000);
        let hash = t.hash;
        pool.add_transaction(t, 1000).unwrap();

        assert!(pool.expire(2000).is_empty());
        let expired = pool.expire(1000 + 3601);
        assert_eq!(expired, vec![hash]);
    }

    #[test]
    fn nonce_in_past_rejected() {
        let mut pool = TransactionPool::with_defaults();
        pool.set_confirmed_nonce([0xAA; 20], 5);
        let t = tx(0xAA, 5, 1000);
        let err = pool.add_transaction(t, 1000).unwrap_err();
        assert!(matches!(err, MempoolError::NonceInPast { .. }));
    }
}
