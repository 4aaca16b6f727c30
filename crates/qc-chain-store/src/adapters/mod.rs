//! Adapter implementations: key-value storage backends, disk-space and
//! checksum guards, and the critical-storage event publisher.

pub mod checksum;
pub mod fs;
pub mod publisher;
pub mod storage;

pub use checksum::Crc32ChecksumProvider;
pub use fs::OsFileSystemAdapter;
pub use publisher::{NoOpPublisher, StorageEventPublisher};
pub use storage::{FileBackedKVStore, InMemoryKVStore};
