//! # Hashing and HMAC primitives
//!
//! The SHA-256 family used for block/merkle digests, keccak256 used for
//! address derivation, and HMAC-SHA256 used for the inter-node broadcast
//! signature and the transitional validator signing fallback.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// 32-byte hash output.
pub type Hash = [u8; 32];

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 digest, one-shot.
#[must_use]
pub fn digest(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 digest over two concatenated inputs, used by the Merkle combinator.
#[must_use]
pub fn digest2(left: &[u8], right: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// HMAC-SHA256, keyed.
#[must_use]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Hash {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Constant-time verification of an HMAC-SHA256 tag.
#[must_use]
pub fn hmac_sha256_verify(key: &[u8], data: &[u8], tag: &[u8; 32]) -> bool {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.verify_slice(tag).is_ok()
}

/// Keccak-256 digest, used for address derivation from public keys.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(digest(b"abc"), digest(b"abc"));
        assert_ne!(digest(b"abc"), digest(b"abd"));
    }

    #[test]
    fn hmac_round_trips() {
        let key = b"secret";
        let tag = hmac_sha256(key, b"payload");
        assert!(hmac_sha256_verify(key, b"payload", &tag));
        assert!(!hmac_sha256_verify(key, b"tampered", &tag));
    }

    #[test]
    fn keccak_differs_from_sha256() {
        assert_ne!(keccak256(b"abc"), digest(b"abc"));
    }
}
