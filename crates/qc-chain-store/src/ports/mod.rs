//! Ports: inbound `ChainStoreApi`, outbound key-value/filesystem/checksum
//! and block-validation dependencies.

pub mod inbound;
pub mod outbound;

pub use inbound::ChainStoreApi;
pub use outbound::{BatchOperation, BlockValidator, ChecksumProvider, FileSystemAdapter, KeyValueStore};
