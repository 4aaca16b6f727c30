//! Mempool error types.

use super::entities::{Address, Hash};
use thiserror::Error;

/// Mempool error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MempoolError {
    /// A transaction with this hash already exists in the pool.
    #[error("duplicate transaction {0:?}")]
    DuplicateTx(Hash),

    /// `tx.fee` is below the current minimum fee.
    #[error("insufficient fee: {fee} below minimum {minimum}")]
    InsufficientFee {
        /// Offered fee.
        fee: u64,
        /// Required minimum fee.
        minimum: u64,
    },

    /// `tx.nonce` is not greater than the sender's last confirmed nonce.
    #[error("nonce {nonce} is not in the future of last confirmed nonce {last_confirmed}")]
    NonceInPast {
        /// Offered nonce.
        nonce: u64,
        /// Last confirmed nonce for this sender.
        last_confirmed: u64,
    },

    /// Pool is at capacity and the new transaction did not strictly exceed
    /// the current lowest priority entry.
    #[error("mempool full at {capacity} entries")]
    MempoolFull {
        /// Configured capacity.
        capacity: usize,
    },

    /// Sender has reached the maximum number of pending transactions.
    #[error("account {address:?} reached its pending-transaction limit of {limit}")]
    AccountLimitReached {
        /// Sender address.
        address: Address,
        /// Configured per-account limit.
        limit: usize,
    },

    /// Transaction hash not present in the pool.
    #[error("transaction {0:?} not found")]
    TransactionNotFound(Hash),

    /// Fee bump too small for Replace-by-Fee.
    #[error("insufficient fee bump: {old_fee} -> {new_fee} (minimum {min_bump_percent}%)")]
    InsufficientFeeBump {
        /// Fee of the transaction being replaced.
        old_fee: u64,
        /// Fee offered by the replacement.
        new_fee: u64,
        /// Configured minimum bump percentage.
        min_bump_percent: u64,
    },

    /// Replace-by-Fee is disabled in configuration.
    #[error("replace-by-fee is disabled")]
    RbfDisabled,

    /// Target transaction is already `PendingInclusion` and cannot be
    /// replaced or directly removed outside the commit protocol.
    #[error("transaction {0:?} is pending inclusion")]
    TransactionPendingInclusion(Hash),

    /// Sender id on an inbound IPC message is not authorized for this
    /// operation.
    #[error("unauthorized sender {sender_id}, allowed: {allowed:?}")]
    UnauthorizedSender {
        /// The rejected sender id.
        sender_id: u8,
        /// The allowed sender ids.
        allowed: Vec<u8>,
    },

    /// Broadcast signature failed verification.
    #[error("invalid broadcast signature")]
    InvalidSignature,

    /// Message timestamp fell outside the accepted validity window.
    #[error("timestamp {timestamp} out of range (now {now})")]
    TimestampOutOfRange {
        /// The rejected timestamp.
        timestamp: u64,
        /// The validator's clock at the time of the check.
        now: u64,
    },

    /// Message nonce was already seen (replay attack).
    #[error("replay detected: nonce already seen")]
    ReplayDetected,

    /// Internal/unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
