//! # Inbound Port — ChainStoreApi
//!
//! Primary driving port: `qc-block-builder` appends newly produced
//! blocks; `qc-resilience`'s reconciler appends pulled blocks and may
//! invoke `replace_tail` when resolving a fork per the single-parent
//! linear-extension policy.

use crate::domain::StorageError;
use shared_types::Block;

/// Primary API for the chain store subsystem.
pub trait ChainStoreApi: Send + Sync {
    /// `append(block)`.
    fn append(&mut self, block: Block) -> Result<(), StorageError>;

    /// `replaceTail(fromIndex, blocks)`.
    fn replace_tail(&mut self, from_index: u64, blocks: Vec<Block>) -> Result<(), StorageError>;

    /// `latest()`.
    fn latest(&self) -> Result<Option<Block>, StorageError>;

    /// `byIndex(height)`.
    fn by_index(&self, height: u64) -> Result<Block, StorageError>;

    /// `byHash(hash)`.
    fn by_hash(&self, hash: &shared_types::Hash) -> Result<Block, StorageError>;

    /// `heightOf()`.
    fn height_of(&self) -> Option<u64>;
}
