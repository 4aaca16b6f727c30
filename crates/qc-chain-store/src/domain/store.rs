//! `ChainStore`: the strict append-only chain. A single writer serializes
//! all mutation through `append`/`replace_tail`; readers take immutable
//! snapshots by hash or height.

use super::errors::{KVStoreError, StorageError};
use super::index::BlockIndex;
use crate::ports::outbound::{BatchOperation, BlockValidator, KeyValueStore};
use shared_types::{Block, Hash, ZERO_HASH};

fn block_key(hash: &Hash) -> Vec<u8> {
    let mut key = b"block:".to_vec();
    key.extend_from_slice(hash);
    key
}

fn height_key(height: u64) -> Vec<u8> {
    let mut key = b"height:".to_vec();
    key.extend_from_slice(&height.to_be_bytes());
    key
}

fn kv_err(e: KVStoreError) -> StorageError {
    StorageError::DatabaseError(e.to_string())
}

/// The append-only chain, backed by a pluggable key-value store.
pub struct ChainStore<K: KeyValueStore, V: BlockValidator> {
    kv: K,
    validator: V,
    index: BlockIndex,
}

impl<K: KeyValueStore, V: BlockValidator> ChainStore<K, V> {
    /// Opens a store over `kv`, rebuilding the height index from its
    /// `height:` prefix.
    pub fn open(kv: K, validator: V) -> Result<Self, StorageError> {
        let mut index = BlockIndex::new();
        for (key, value) in kv.prefix_scan(b"height:").map_err(kv_err)? {
            let height = u64::from_be_bytes(
                key[b"height:".len()..]
                    .try_into()
                    .map_err(|_| StorageError::DatabaseError("malformed height key".to_string()))?,
            );
            let hash: Hash = value
                .try_into()
                .map_err(|_| StorageError::DatabaseError("malformed height value".to_string()))?;
            index.insert(height, hash);
        }
        Ok(Self { kv, validator, index })
    }

    /// `heightOf()`: the current chain tip height, `None` before genesis.
    #[must_use]
    pub fn height_of(&self) -> Option<u64> {
        self.index.latest_height()
    }

    /// Hash of the current tip, `ZERO_HASH` before genesis.
    #[must_use]
    pub fn latest_hash(&self) -> Hash {
        self.index.latest_hash().unwrap_or(ZERO_HASH)
    }

    /// `latest()`: the current tip block, if any has been appended.
    pub fn latest(&self) -> Result<Option<Block>, StorageError> {
        match self.index.latest_hash() {
            Some(hash) => self.by_hash(&hash).map(Some),
            None => Ok(None),
        }
    }

    /// `byIndex(height)`.
    pub fn by_index(&self, height: u64) -> Result<Block, StorageError> {
        let hash = self
            .index
            .get(height)
            .ok_or_else(|| StorageError::NotFound(format!("height {height}")))?;
        self.by_hash(&hash)
    }

    /// `byHash(hash)`.
    pub fn by_hash(&self, hash: &Hash) -> Result<Block, StorageError> {
        let raw = self
            .kv
            .get(&block_key(hash))
            .map_err(kv_err)?
            .ok_or_else(|| StorageError::NotFound(hex::encode(hash)))?;
        bincode::deserialize(&raw).map_err(|e| StorageError::DatabaseError(e.to_string()))
    }

    fn validate_for_append(&self, block: &Block, expected_height: u64, expected_parent: Hash) -> Result<(), StorageError> {
        if block.index != expected_height {
            return Err(StorageError::IndexGap {
                expected: expected_height,
                actual: block.index,
            });
        }
        if block.parent_hash != expected_parent {
            return Err(StorageError::ParentMismatch {
                expected: hex::encode(expected_parent),
                actual: hex::encode(block.parent_hash),
            });
        }
        if self.kv.exists(&block_key(&block.hash)).map_err(kv_err)? {
            return Err(StorageError::DuplicateHash(hex::encode(block.hash)));
        }
        if !self.validator.merkle_root_matches(block) {
            return Err(StorageError::MerkleMismatch { height: block.index });
        }
        if !self.validator.signature_valid(block) {
            return Err(StorageError::SignatureReject { height: block.index });
        }
        Ok(())
    }

    /// `append(block)`: validates parent/index/duplicate/merkle/signature,
    /// then writes the block and height index entry in one atomic batch.
    pub fn append(&mut self, block: Block) -> Result<(), StorageError> {
        let expected_height = self.index.latest_height().map_or(0, |h| h + 1);
        let expected_parent = self.index.latest_hash().unwrap_or(ZERO_HASH);
        self.validate_for_append(&block, expected_height, expected_parent)?;

        let serialized = bincode::serialize(&block).map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        self.kv
            .atomic_batch_write(vec![
                BatchOperation::put(block_key(&block.hash), serialized),
                BatchOperation::put(height_key(block.index), block.hash.to_vec()),
            ])
            .map_err(kv_err)?;
        self.index.insert(block.index, block.hash);
        Ok(())
    }

    /// `replaceTail(fromIndex, blocks)`: atomically discards the suffix
    /// from `from_index` and replaces it, only if the replacement is at
    /// least as long and every block independently passes append
    /// validation against the preceding block in the new suffix.
    pub fn replace_tail(&mut self, from_index: u64, blocks: Vec<Block>) -> Result<(), StorageError> {
        let current_height = self.index.latest_height().unwrap_or(0);
        let current_len = current_height.saturating_sub(from_index) + 1;
        if blocks.len() < current_len as usize {
            return Err(StorageError::ReplaceNotAllowed {
                reason: "replacement tail is shorter than the current suffix".to_string(),
            });
        }
        let mut expected_parent = if from_index == 0 {
            ZERO_HASH
        } else {
            self.index
                .get(from_index - 1)
                .ok_or_else(|| StorageError::ReplaceNotAllowed {
                    reason: "no block precedes fromIndex".to_string(),
                })?
        };
        for (offset, block) in blocks.iter().enumerate() {
            let expected_height = from_index + offset as u64;
            if let Err(e) = self.validate_replacement_block(block, expected_height, expected_parent) {
                return Err(StorageError::ReplaceNotAllowed { reason: e.to_string() });
            }
            expected_parent = block.hash;
        }

        let mut ops = Vec::with_capacity(blocks.len() * 2);
        for height in from_index..=current_height {
            if let Ok(hash) = self.by_index(height).map(|b| b.hash) {
                ops.push(BatchOperation::delete(block_key(&hash)));
            }
            ops.push(BatchOperation::delete(height_key(height)));
        }
        for block in &blocks {
            let serialized = bincode::serialize(block).map_err(|e| StorageError::DatabaseError(e.to_string()))?;
            ops.push(BatchOperation::put(block_key(&block.hash), serialized));
            ops.push(BatchOperation::put(height_key(block.index), block.hash.to_vec()));
        }
        self.kv.atomic_batch_write(ops).map_err(kv_err)?;

        self.index.truncate_from(from_index);
        for block in &blocks {
            self.index.insert(block.index, block.hash);
        }
        Ok(())
    }

    /// Validates a replacement-tail block without the duplicate-hash check
    /// (the block being replaced shares a height with itself, not a hash
    /// collision).
    fn validate_replacement_block(&self, block: &Block, expected_height: u64, expected_parent: Hash) -> Result<(), StorageError> {
        if block.index != expected_height {
            return Err(StorageError::IndexGap {
                expected: expected_height,
                actual: block.index,
            });
        }
        if block.parent_hash != expected_parent {
            return Err(StorageError::ParentMismatch {
                expected: hex::encode(expected_parent),
                actual: hex::encode(block.parent_hash),
            });
        }
        if !self.validator.merkle_root_matches(block) {
            return Err(StorageError::MerkleMismatch { height: block.index });
        }
        if !self.validator.signature_valid(block) {
            return Err(StorageError::SignatureReject { height: block.index });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::memory::InMemoryKVStore;
    use crate::ports::outbound::AcceptAllValidator;
    use shared_types::Transaction;
    use std::collections::BTreeMap;

    fn block(index: u64, parent_hash: Hash) -> Block {
        Block {
            index,
            parent_hash,
            timestamp: 1_000 + index,
            validator_address: [1u8; 20],
            signature: "ecdsa:00".to_string(),
            merkle_root: [0u8; 32],
            transactions_count: 0,
            transactions: Vec::<Transaction>::new(),
            metadata: BTreeMap::new(),
            hash: [index as u8 + 1; 32],
        }
    }

    fn store() -> ChainStore<InMemoryKVStore, AcceptAllValidator> {
        ChainStore::open(InMemoryKVStore::new(), AcceptAllValidator).unwrap()
    }

    #[test]
    fn append_genesis_then_extends() {
        let mut s = store();
        s.append(block(0, ZERO_HASH)).unwrap();
        assert_eq!(s.height_of(), Some(0));
        s.append(block(1, s.latest_hash())).unwrap();
        assert_eq!(s.height_of(), Some(1));
        assert_eq!(s.by_index(0).unwrap().index, 0);
    }

    #[test]
    fn append_rejects_parent_mismatch() {
        let mut s = store();
        s.append(block(0, ZERO_HASH)).unwrap();
        let err = s.append(block(1, [9u8; 32])).unwrap_err();
        assert!(matches!(err, StorageError::ParentMismatch { .. }));
        assert_eq!(s.height_of(), Some(0));
    }

    #[test]
    fn append_rejects_index_gap() {
        let mut s = store();
        s.append(block(0, ZERO_HASH)).unwrap();
        let tip = s.latest_hash();
        let err = s.append(block(5, tip)).unwrap_err();
        assert!(matches!(err, StorageError::IndexGap { .. }));
    }

    #[test]
    fn append_rejects_duplicate_hash() {
        let mut s = store();
        let b = block(0, ZERO_HASH);
        s.append(b.clone()).unwrap();
        let mut dup = block(1, s.latest_hash());
        dup.hash = b.hash;
        let err = s.append(dup).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateHash(_)));
    }

    #[test]
    fn replace_tail_rejects_shorter_suffix() {
        let mut s = store();
        s.append(block(0, ZERO_HASH)).unwrap();
        s.append(block(1, s.latest_hash())).unwrap();
        s.append(block(2, s.latest_hash())).unwrap();
        let err = s.replace_tail(1, vec![block(1, s.by_index(0).unwrap().hash)]).unwrap_err();
        assert!(matches!(err, StorageError::ReplaceNotAllowed { .. }));
    }

    #[test]
    fn replace_tail_swaps_in_new_suffix() {
        let mut s = store();
        s.append(block(0, ZERO_HASH)).unwrap();
        s.append(block(1, s.latest_hash())).unwrap();
        let genesis_hash = s.by_index(0).unwrap().hash;

        let mut new_1 = block(1, genesis_hash);
        new_1.hash = [200u8; 32];
        let mut new_2 = block(2, new_1.hash);
        new_2.hash = [201u8; 32];
        s.replace_tail(1, vec![new_1.clone(), new_2.clone()]).unwrap();

        assert_eq!(s.height_of(), Some(2));
        assert_eq!(s.by_index(1).unwrap().hash, new_1.hash);
        assert_eq!(s.by_index(2).unwrap().hash, new_2.hash);
    }
}
