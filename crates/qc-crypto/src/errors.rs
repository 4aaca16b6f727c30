//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length in bytes.
        actual: usize,
    },

    /// Signature verification failed.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid signature format.
    #[error("invalid signature format")]
    InvalidSignatureFormat,

    /// Invalid public key.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Invalid private key.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Public key recovery from a signature and message failed.
    #[error("signature recovery failed")]
    RecoveryFailed,

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Invalid input for a cryptographic operation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
