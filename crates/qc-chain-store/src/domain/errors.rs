//! Storage subsystem error types.
//!
//! `shared_types::StorageError` carries the append/replaceTail invariant
//! taxonomy (`ParentMismatch`, `IndexGap`, `DuplicateHash`,
//! `MerkleMismatch`, `SignatureReject`, `ReplaceNotAllowed`, …); this
//! module adds the infrastructure-level errors raised by the key-value
//! backend and filesystem adapters underneath it.

use thiserror::Error;

pub use shared_types::StorageError;

/// Errors raised by a `KeyValueStore` implementation.
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    #[error("key-value store I/O error: {message}")]
    Io { message: String },
    #[error("key-value store corruption: {message}")]
    Corruption { message: String },
    #[error("key not found")]
    NotFound,
}

/// Errors raised by a `FileSystemAdapter` implementation.
#[derive(Debug, Clone, Error)]
pub enum FsError {
    #[error("filesystem I/O error: {message}")]
    Io { message: String },
    #[error("filesystem permission denied")]
    PermissionDenied,
}
