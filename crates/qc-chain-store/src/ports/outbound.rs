//! Outbound (driven) ports: the key-value backend, filesystem/checksum
//! guards, and block validation delegated to consensus/block-builder.

use crate::domain::errors::{FsError, KVStoreError};
use shared_types::Block;

/// Abstract interface for key-value database operations. Production
/// backends (file-mirror, or a future embedded database) and the
/// in-memory test backend both implement this.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Either every operation in the batch succeeds, or none are applied —
    /// `append`/`replaceTail` rely on this for the relational/file-mirror
    /// all-or-nothing guarantee.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// A single write in an atomic batch.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Self::Delete { key: key.into() }
    }
}

/// Disk-space guard consulted before a write, guarding the `DiskFull`
/// invariant.
pub trait FileSystemAdapter: Send + Sync {
    fn available_disk_space_percent(&self) -> Result<u8, FsError>;
}

/// Checksum provider for the file mirror's crash-recovery integrity check.
pub trait ChecksumProvider: Send + Sync {
    fn compute_crc32c(&self, data: &[u8]) -> u32;

    fn verify_crc32c(&self, data: &[u8], expected: u32) -> bool {
        self.compute_crc32c(data) == expected
    }
}

/// Block-level validation delegated to `qc-block-builder` (Merkle root)
/// and `qc-consensus` (signature), kept as a crate-local port so this
/// crate never depends on either concretely.
pub trait BlockValidator: Send + Sync {
    fn merkle_root_matches(&self, block: &Block) -> bool;
    fn signature_valid(&self, block: &Block) -> bool;
}

#[cfg(test)]
pub struct AcceptAllValidator;

#[cfg(test)]
impl BlockValidator for AcceptAllValidator {
    fn merkle_root_matches(&self, _block: &Block) -> bool {
        true
    }

    fn signature_valid(&self, _block: &Block) -> bool {
        true
    }
}
