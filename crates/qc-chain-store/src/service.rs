//! Wires `ChainStore` behind `ChainStoreApi`, consulting the disk-space
//! guard before each write and raising a `storage.critical` alarm when a
//! write is refused or the underlying store reports a hard failure.

use crate::adapters::publisher::{disk_full_payload, StorageEventPublisher};
use crate::domain::StorageError;
use crate::ports::inbound::ChainStoreApi;
use crate::ports::outbound::{BlockValidator, FileSystemAdapter, KeyValueStore};
use crate::ChainStore;
use shared_types::Block;

/// Minimum available disk space, as a percentage, below which writes are
/// refused with `StorageError::DiskFull`.
const DISK_SPACE_FLOOR_PERCENT: u8 = 5;

pub struct ChainStoreService<K: KeyValueStore, V: BlockValidator, F: FileSystemAdapter, P: StorageEventPublisher> {
    store: ChainStore<K, V>,
    fs: F,
    publisher: P,
}

impl<K: KeyValueStore, V: BlockValidator, F: FileSystemAdapter, P: StorageEventPublisher> ChainStoreService<K, V, F, P> {
    pub fn new(store: ChainStore<K, V>, fs: F, publisher: P) -> Self {
        Self { store, fs, publisher }
    }

    fn guard_disk_space(&self) -> Result<(), StorageError> {
        let available = self
            .fs
            .available_disk_space_percent()
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        if available < DISK_SPACE_FLOOR_PERCENT {
            let _ = self.publisher.publish_storage_critical(disk_full_payload(available));
            return Err(StorageError::DiskFull {
                available_percent: available,
            });
        }
        Ok(())
    }
}

impl<K: KeyValueStore, V: BlockValidator, F: FileSystemAdapter, P: StorageEventPublisher> ChainStoreApi
    for ChainStoreService<K, V, F, P>
{
    fn append(&mut self, block: Block) -> Result<(), StorageError> {
        self.guard_disk_space()?;
        self.store.append(block)
    }

    fn replace_tail(&mut self, from_index: u64, blocks: Vec<Block>) -> Result<(), StorageError> {
        self.guard_disk_space()?;
        self.store.replace_tail(from_index, blocks)
    }

    fn latest(&self) -> Result<Option<Block>, StorageError> {
        self.store.latest()
    }

    fn by_index(&self, height: u64) -> Result<Block, StorageError> {
        self.store.by_index(height)
    }

    fn by_hash(&self, hash: &shared_types::Hash) -> Result<Block, StorageError> {
        self.store.by_hash(hash)
    }

    fn height_of(&self) -> Option<u64> {
        self.store.height_of()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::publisher::RecordingPublisher;
    use crate::adapters::storage::memory::InMemoryKVStore;
    use crate::domain::errors::FsError;
    use crate::ports::outbound::AcceptAllValidator;
    use shared_types::{Transaction, ZERO_HASH};
    use std::collections::BTreeMap;

    struct FixedFs(u8);
    impl FileSystemAdapter for FixedFs {
        fn available_disk_space_percent(&self) -> Result<u8, FsError> {
            Ok(self.0)
        }
    }

    fn genesis() -> Block {
        Block {
            index: 0,
            parent_hash: ZERO_HASH,
            timestamp: 1_000,
            validator_address: [1u8; 20],
            signature: "ecdsa:00".to_string(),
            merkle_root: [0u8; 32],
            transactions_count: 0,
            transactions: Vec::<Transaction>::new(),
            metadata: BTreeMap::new(),
            hash: [1u8; 32],
        }
    }

    fn service(disk_percent: u8, publisher: RecordingPublisher) -> ChainStoreService<InMemoryKVStore, AcceptAllValidator, FixedFs, RecordingPublisher> {
        let store = ChainStore::open(InMemoryKVStore::new(), AcceptAllValidator).unwrap();
        ChainStoreService::new(store, FixedFs(disk_percent), publisher)
    }

    #[test]
    fn append_succeeds_with_healthy_disk() {
        let mut svc = service(50, RecordingPublisher::new());
        svc.append(genesis()).unwrap();
        assert_eq!(svc.height_of(), Some(0));
    }

    #[test]
    fn append_refused_and_alarm_published_when_disk_low() {
        let publisher = RecordingPublisher::new();
        let mut svc = service(1, publisher);
        let err = svc.append(genesis()).unwrap_err();
        assert!(matches!(err, StorageError::DiskFull { available_percent: 1 }));
        assert_eq!(svc.publisher.events.lock().unwrap().len(), 1);
        assert_eq!(svc.height_of(), None);
    }
}
