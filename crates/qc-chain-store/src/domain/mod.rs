//! Domain layer: the append-only block store and its height index.

pub mod errors;
pub mod index;
pub mod store;

pub use errors::{FsError, KVStoreError, StorageError};
pub use index::BlockIndex;
pub use store::ChainStore;
