//! Consensus error types.

use shared_types::Address;
use thiserror::Error;

/// Consensus subsystem error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// Validator already present in the registry.
    #[error("validator {0:?} already registered")]
    AlreadyRegistered(Address),

    /// No validator with this address.
    #[error("validator {0:?} not found")]
    ValidatorNotFound(Address),

    /// `decreaseStake` would take a validator below the configured minimum.
    #[error("stake {resulting} below minimum {minimum} for {address:?}")]
    BelowMinimum {
        /// Validator address.
        address: Address,
        /// Stake that would result from the operation.
        resulting: u64,
        /// Configured minimum stake.
        minimum: u64,
    },

    /// No eligible validators when a leader must be selected.
    #[error("no active validators to select a leader from")]
    NoActiveValidators,

    /// The node attempting to sign a block is not the selected leader for
    /// this height.
    #[error("node {node:?} is not the selected leader for height {height}")]
    NotLeader {
        /// The node that attempted to sign.
        node: Address,
        /// The height it attempted to sign at.
        height: u64,
    },

    /// Neither an ECDSA key nor HMAC fallback was available to sign with.
    #[error("no signing key material available for {0:?}")]
    NoSigningKey(Address),

    /// A block's tagged signature does not parse (`ecdsa:`/`hmac_sha256:`).
    #[error("malformed signature tag")]
    MalformedSignature,

    /// Signature verification failed under either mode.
    #[error("signature verification failed for block {0}")]
    InvalidSignature(u64),

    /// The signer recovered from or tagged in the signature was not the
    /// validator selected as leader for this height.
    #[error("signer {signer:?} was not the selected leader for height {height}")]
    WrongSigner {
        /// Recovered/tagged signer.
        signer: Address,
        /// Block height in question.
        height: u64,
    },

    /// Internal/unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
