//! Service orchestration: wires `TransactionPool` behind the `MempoolApi`
//! port, seeding confirmed nonces from the outbound `NonceProvider`.

use crate::domain::{
    Hash, MempoolConfig, MempoolError, MempoolStats, PooledTransaction, ProposeResult,
    TransactionPool, TransactionState,
};
use crate::ports::{MempoolApi, NonceProvider, TimeSource};
use shared_types::Transaction;

/// Default mempool service: a `TransactionPool` plus a time source and an
/// optional nonce provider used to seed/refresh the `NonceInPast` check.
pub struct MempoolService<T: TimeSource, N: NonceProvider> {
    pool: TransactionPool,
    time_source: T,
    nonce_provider: N,
}

impl<T: TimeSource, N: NonceProvider> MempoolService<T, N> {
    /// Creates a new service with the given configuration.
    pub fn new(config: MempoolConfig, time_source: T, nonce_provider: N) -> Self {
        Self {
            pool: TransactionPool::new(config),
            time_source,
            nonce_provider,
        }
    }

    /// Refreshes the cached confirmed nonce for `address` from the
    /// outbound `NonceProvider`, in case the mempool's own bookkeeping has
    /// fallen behind (e.g. right after a reorg or on startup).
    pub fn refresh_confirmed_nonce(&mut self, address: &shared_types::Address) -> Result<(), MempoolError> {
        let nonce = self.nonce_provider.last_confirmed_nonce(address)?;
        self.pool.set_confirmed_nonce(*address, nonce);
        Ok(())
    }

    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }
}

impl<T: TimeSource, N: NonceProvider> MempoolApi for MempoolService<T, N> {
    fn add_transaction(&mut self, tx: Transaction) -> Result<Hash, MempoolError> {
        let hash = tx.hash;
        let now = self.time_source.now();
        self.pool.add_transaction(tx, now)?;
        Ok(hash)
    }

    fn get_batch(&self, max_count: usize) -> Vec<PooledTransaction> {
        self.pool.get_batch(max_count).into_iter().cloned().collect()
    }

    fn propose_transactions(&mut self, tx_hashes: &[Hash], block_height: u64) -> ProposeResult {
        let now = self.time_source.now();
        self.pool.propose(tx_hashes, block_height, now)
    }

    fn remove(&mut self, tx_hashes: &[Hash]) -> Vec<Hash> {
        self.pool.remove(tx_hashes)
    }

    fn rollback_proposal(&mut self, tx_hashes: &[Hash]) -> Vec<Hash> {
        self.pool.rollback(tx_hashes)
    }

    fn expire(&mut self, now: u64) -> Vec<Hash> {
        self.pool.expire(now)
    }

    fn get_transaction(&self, hash: &Hash) -> Option<PooledTransaction> {
        self.pool.get(hash).cloned()
    }

    fn get_transaction_state(&self, hash: &Hash) -> Option<TransactionState> {
        self.pool.get(hash).map(|tx| tx.state)
    }

    fn contains(&self, hash: &Hash) -> bool {
        self.pool.contains(hash)
    }

    fn cleanup_timeouts(&mut self) -> Vec<Hash> {
        let now = self.time_source.now();
        self.pool.cleanup_timeouts(now)
    }

    fn size(&self) -> usize {
        self.pool.size()
    }

    fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    fn stats(&self) -> MempoolStats {
        let now = self.time_source.now();
        self.pool.stats(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::{MockNonceProvider, MockTimeSource};

    fn test_tx(nonce: u64, hash_byte: u8) -> Transaction {
        Transaction {
            from: [0xAA; 20],
            to: Some([0xBB; 20]),
            amount: 1_000,
            fee: 21_000,
            nonce,
            gas_limit: Some(21_000),
            gas_price: None,
            data: vec![],
            signature: [0u8; 65],
            hash: [hash_byte; 32],
        }
    }

    fn service() -> MempoolService<MockTimeSource, MockNonceProvider> {
        MempoolService::new(
            MempoolConfig::for_testing(),
            MockTimeSource::new(1000),
            MockNonceProvider::new(),
        )
    }

    #[test]
    fn add_and_retrieve_transaction() {
        let mut svc = service();
        let hash = svc.add_transaction(test_tx(0, 0xAB)).unwrap();
        assert!(svc.contains(&hash));
        assert_eq!(svc.size(), 1);
    }

    #[test]
    fn propose_moves_out_of_batch() {
        let mut svc = service();
        let hash = svc.add_transaction(test_tx(0, 0xAB)).unwrap();
        let result = svc.propose_transactions(&[hash], 1);
        assert_eq!(result.proposed_count, 1);
        assert!(svc.get_batch(10).is_empty());
    }

    #[test]
    fn refresh_confirmed_nonce_blocks_stale_nonce() {
        let address = [0xAA; 20];
        let mut svc = MempoolService::new(
            MempoolConfig::for_testing(),
            MockTimeSource::new(1000),
            MockNonceProvider::new().with_nonce(address, 5),
        );
        svc.refresh_confirmed_nonce(&address).unwrap();

        let result = svc.add_transaction(test_tx(3, 0xAB));
        assert!(matches!(result, Err(MempoolError::NonceInPast { .. })));
    }
}
