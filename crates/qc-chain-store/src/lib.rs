//! # Chain Store
//!
//! The authoritative, append-only persistence layer for the block chain.
//! Single-writer: `append` and `replace_tail` serialize all mutation;
//! `latest`/`by_index`/`by_hash`/`height_of` take immutable snapshots.
//!
//! ## Invariants
//!
//! - Blocks extend the chain sequentially; no gaps, no duplicate hashes.
//! - A block's Merkle root and signature are validated before acceptance.
//! - Writes are refused below a disk-space floor, raising a critical alarm.
//! - `replace_tail` only accepts a same-or-longer, internally consistent
//!   replacement suffix — used to resolve a fork via single-parent linear
//!   extension.
//!
//! ## Crate layout (hexagonal architecture)
//!
//! - `domain/` — `ChainStore`, the in-memory height index, and errors.
//! - `ports/` — `ChainStoreApi` (inbound); `KeyValueStore`,
//!   `FileSystemAdapter`, `ChecksumProvider`, `BlockValidator` (outbound).
//! - `adapters/` — in-memory and file-backed key-value stores, the disk
//!   and checksum guards, and the critical-storage event publisher.
//! - `service.rs` — `ChainStoreService`, wiring the disk-space guard in
//!   front of the domain store.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::{FsError, KVStoreError, StorageError};
pub use domain::store::ChainStore;
pub use ports::inbound::ChainStoreApi;
pub use ports::outbound::{BatchOperation, BlockValidator, ChecksumProvider, FileSystemAdapter, KeyValueStore};
pub use service::ChainStoreService;
