//! # Error Types
//!
//! Defines error types shared across subsystems. Per-crate domain logic
//! defines its own finer-grained error enum (see e.g.
//! `qc-mempool::domain::errors`); these are the ones referenced from more
//! than one crate.

use thiserror::Error;

/// Errors that can occur when appending to or replacing the tail of the
/// chain store.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Requested block not found in storage.
    #[error("block not found: {0}")]
    NotFound(String),

    /// `append`'s `parent_hash` does not equal the current tip's hash.
    #[error("parent mismatch: expected parent {expected}, got {actual}")]
    ParentMismatch { expected: String, actual: String },

    /// `append`'s `index` is not exactly `heightOf() + 1`.
    #[error("index gap: expected {expected}, got {actual}")]
    IndexGap { expected: u64, actual: u64 },

    /// A block with this hash is already present.
    #[error("duplicate block hash: {0}")]
    DuplicateHash(String),

    /// Recomputed Merkle root does not match the block's declared root.
    #[error("merkle mismatch for block at height {height}")]
    MerkleMismatch { height: u64 },

    /// Block signature failed verification against the active validator set.
    #[error("signature rejected for block at height {height}")]
    SignatureReject { height: u64 },

    /// `replaceTail` was attempted with a shorter/invalid suffix.
    #[error("replace not allowed: {reason}")]
    ReplaceNotAllowed { reason: String },

    /// Data corruption detected during read (checksum mismatch).
    #[error("data corruption: checksum mismatch for block {block_hash}")]
    DataCorruption { block_hash: String },

    /// Disk space below required threshold.
    #[error("disk full: only {available_percent}% available")]
    DiskFull { available_percent: u8 },

    /// Underlying database/file-mirror operation failed.
    #[error("database error: {0}")]
    DatabaseError(String),
}

/// Errors related to inter-node message verification (event bus envelopes
/// and peer-to-peer broadcast signatures).
#[derive(Debug, Clone, Error)]
pub enum MessageError {
    /// Message version not supported.
    #[error("unsupported version: received {received}, supported {supported}")]
    UnsupportedVersion { received: u16, supported: u16 },

    /// Timestamp outside valid window.
    #[error("timestamp out of range: {timestamp} not within valid window")]
    TimestampOutOfRange { timestamp: u64 },

    /// Replay attack detected.
    #[error("replay detected: nonce {nonce} already seen")]
    ReplayDetected { nonce: String },

    /// Invalid signature (bad `X-Broadcast-Signature` or envelope signature).
    #[error("invalid signature")]
    InvalidSignature,

    /// Reply-to field mismatch (forwarding attack).
    #[error("reply-to mismatch: reply_to.subsystem_id={reply_to} != sender_id={sender}")]
    ReplyToMismatch { reply_to: u8, sender: u8 },

    /// Unauthorized sender for this message type.
    #[error("unauthorized: subsystem {sender} not allowed to send {message_type}")]
    Unauthorized { sender: u8, message_type: String },
}

/// Node operational states, surfaced by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Normal operation.
    Running,
    /// Synchronizing with the network (height reconciliation in progress).
    Syncing,
    /// Halted due to a fatal chain-store write failure (awaiting intervention).
    HaltedAwaitingIntervention,
}
