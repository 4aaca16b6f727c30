//! # Cryptographic Primitives
//!
//! Hashing, HMAC, keccak256 and secp256k1 signing used throughout the node:
//! block/merkle digests, the dual-mode validator signature
//! (`ecdsa:`/`hmac_sha256:`), the `X-Broadcast-Signature` header, and address
//! recovery from raw signed transactions.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256, HMAC-SHA256, Keccak-256 | Merkle digests, broadcast signatures, address derivation |
//! | `ecdsa` | secp256k1 | Transaction/block/node identity signing, address recovery |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S normalization.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

pub use ecdsa::{
    address_from_public_key, recover_address, verify, AddressBytes, KeyPair, PublicKeyBytes,
    SignatureBytes,
};
pub use errors::CryptoError;
pub use hashing::{digest, digest2, hmac_sha256, hmac_sha256_verify, keccak256, Hash};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
