//! Outbound (driven) ports: mempool batching, leader selection/signing,
//! chain append, and time. Kept as crate-local traits rather than direct
//! dependencies on `qc-mempool`/`qc-consensus`/`qc-chain-store`, matching
//! the ports-not-concrete-deps discipline the rest of the workspace uses;
//! `node-runtime` supplies the concrete adapters.

use shared_types::{Address, Hash, Transaction};

/// A batch source: the mempool's externally-visible surface as far as
/// block assembly is concerned.
pub trait MempoolPort: Send + Sync {
    /// Highest-priority transactions, up to `max_count`.
    fn get_batch(&self, max_count: usize) -> Vec<Transaction>;

    /// Confirms inclusion, permanently removing these hashes from the pool.
    fn remove(&mut self, tx_hashes: &[Hash]);
}

/// The canonical fields signed over a block header, mirroring
/// `qc-consensus::domain::engine::BlockSigningPayload` field-for-field so
/// the two crates agree on what bytes get signed without a direct
/// dependency between them.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    pub hash: Hash,
    pub index: u64,
    pub timestamp: u64,
    pub previous_hash: Hash,
    pub merkle_root: Hash,
    pub transactions_count: u32,
    pub node_id: Address,
}

/// Leader selection and block signing, backed by `qc-consensus`.
pub trait ConsensusPort: Send + Sync {
    /// Selects the leader for the block following `previous_hash` at
    /// `height`.
    fn select_leader(&mut self, previous_hash: Hash, height: u64) -> Result<Address, String>;

    /// Signs the block payload as `local_node`. Callers must already have
    /// confirmed `local_node` is the selected leader.
    fn sign_block(&mut self, request: &SigningRequest) -> Result<String, String>;
}

/// Chain append, backed by `qc-chain-store`.
pub trait ChainStorePort: Send + Sync {
    /// Current chain height (0 if only genesis exists).
    fn latest_height(&self) -> u64;

    /// Hash of the current tip.
    fn latest_hash(&self) -> Hash;

    /// Appends a fully assembled, signed block. `Err` on any rejection
    /// (parent mismatch, duplicate hash, etc.) is surfaced to the caller
    /// as `BuildError::AppendConflict`.
    fn append(&mut self, block: shared_types::Block) -> Result<(), String>;
}

/// Time source for consistent, testable timestamp handling.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> u64;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[cfg(test)]
pub struct MockMempool {
    pub batch: Vec<Transaction>,
    pub removed: Vec<Hash>,
}

#[cfg(test)]
impl MempoolPort for MockMempool {
    fn get_batch(&self, max_count: usize) -> Vec<Transaction> {
        self.batch.iter().take(max_count).cloned().collect()
    }

    fn remove(&mut self, tx_hashes: &[Hash]) {
        self.removed.extend_from_slice(tx_hashes);
    }
}

#[cfg(test)]
pub struct MockConsensus {
    pub leader: Address,
    pub signature: String,
}

#[cfg(test)]
impl ConsensusPort for MockConsensus {
    fn select_leader(&mut self, _previous_hash: Hash, _height: u64) -> Result<Address, String> {
        Ok(self.leader)
    }

    fn sign_block(&mut self, _request: &SigningRequest) -> Result<String, String> {
        Ok(self.signature.clone())
    }
}

#[cfg(test)]
pub struct MockChainStore {
    pub height: u64,
    pub hash: Hash,
    pub appended: Vec<shared_types::Block>,
    pub reject: bool,
}

#[cfg(test)]
impl ChainStorePort for MockChainStore {
    fn latest_height(&self) -> u64 {
        self.height
    }

    fn latest_hash(&self) -> Hash {
        self.hash
    }

    fn append(&mut self, block: shared_types::Block) -> Result<(), String> {
        if self.reject {
            return Err("parent mismatch".to_string());
        }
        self.height = block.index;
        self.hash = block.hash;
        self.appended.push(block);
        Ok(())
    }
}

#[cfg(test)]
pub struct MockTimeSource(pub u64);

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> u64 {
        self.0
    }
}
