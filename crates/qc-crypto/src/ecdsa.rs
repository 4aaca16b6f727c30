//! # ECDSA keypairs and recoverable signatures (secp256k1)
//!
//! Transaction, block and node identity signing. Signatures are produced in
//! recoverable form (r, s, v) so that `qc-raw-ingestor` can recover a
//! sender's address from a signature alone, Ethereum-style.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing).
//! - Low-S normalization is enforced by the underlying `k256` crate.

use crate::errors::CryptoError;
use crate::hashing::keccak256;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};

/// Compressed secp256k1 public key (33 bytes).
pub type PublicKeyBytes = [u8; 33];

/// Recoverable ECDSA signature: 64 bytes (r || s) followed by a 1-byte
/// recovery id in `{0, 1}`.
pub type SignatureBytes = [u8; 65];

/// A 20-byte address derived from a public key.
pub type AddressBytes = [u8; 20];

/// A secp256k1 signing keypair.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a random keypair.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Construct from a 32-byte secret scalar.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Compressed public key bytes.
    #[must_use]
    pub fn public_key(&self) -> PublicKeyBytes {
        let sec1 = self.signing_key.verifying_key().to_sec1_bytes();
        let mut out = [0u8; 33];
        out.copy_from_slice(&sec1[..33]);
        out
    }

    /// Address derived from this keypair's public key (see
    /// [`address_from_public_key`]).
    #[must_use]
    pub fn address(&self) -> AddressBytes {
        address_from_public_key(&self.public_key()).expect("own verifying key is always valid")
    }

    /// Produce a recoverable signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Result<SignatureBytes, CryptoError> {
        let (signature, recovery_id): (EcdsaSignature, RecoveryId) = self
            .signing_key
            .sign_recoverable(message)
            .map_err(|_| CryptoError::SignatureVerificationFailed)?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(out)
    }
}

/// Derive a 20-byte address from a compressed public key: the last 20 bytes
/// of `keccak256` of the uncompressed (X, Y) coordinates, omitting the SEC1
/// prefix byte.
pub fn address_from_public_key(public_key: &PublicKeyBytes) -> Result<AddressBytes, CryptoError> {
    let verifying_key =
        VerifyingKey::from_sec1_bytes(public_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    let uncompressed = verifying_key.to_encoded_point(false);
    let coords = uncompressed.as_bytes();
    // coords[0] is the 0x04 uncompressed-point tag.
    let hash = keccak256(&coords[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Ok(address)
}

/// Verify a recoverable signature against a known public key.
pub fn verify(
    public_key: &PublicKeyBytes,
    message: &[u8],
    signature: &SignatureBytes,
) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_sec1_bytes(public_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig =
        EcdsaSignature::from_slice(&signature[..64]).map_err(|_| CryptoError::InvalidSignatureFormat)?;
    use k256::ecdsa::signature::Verifier;
    verifying_key
        .verify(message, &sig)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}

/// Recover the signer's address from a message and a recoverable signature,
/// without requiring the public key.
pub fn recover_address(
    message: &[u8],
    signature: &SignatureBytes,
) -> Result<AddressBytes, CryptoError> {
    let sig =
        EcdsaSignature::from_slice(&signature[..64]).map_err(|_| CryptoError::InvalidSignatureFormat)?;
    let recovery_id =
        RecoveryId::from_byte(signature[64]).ok_or(CryptoError::InvalidSignatureFormat)?;
    let verifying_key = VerifyingKey::recover_from_msg(message, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    let sec1 = verifying_key.to_sec1_bytes();
    let mut compressed = [0u8; 33];
    compressed.copy_from_slice(&sec1[..33]);
    address_from_public_key(&compressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_recover_matches_address() {
        let keypair = KeyPair::generate();
        let message = b"quantum-chain block signing payload";
        let signature = keypair.sign(message).unwrap();

        assert!(verify(&keypair.public_key(), message, &signature).is_ok());
        assert_eq!(recover_address(message, &signature).unwrap(), keypair.address());
    }

    #[test]
    fn wrong_message_fails_verification() {
        let keypair = KeyPair::generate();
        let signature = keypair.sign(b"message1").unwrap();
        assert!(verify(&keypair.public_key(), b"message2", &signature).is_err());
    }

    #[test]
    fn deterministic_signatures() {
        let keypair = KeyPair::from_bytes([0xABu8; 32]).unwrap();
        let message = b"deterministic test";
        assert_eq!(keypair.sign(message).unwrap(), keypair.sign(message).unwrap());
    }

    #[test]
    fn address_is_stable() {
        let keypair = KeyPair::generate();
        assert_eq!(keypair.address(), address_from_public_key(&keypair.public_key()).unwrap());
    }
}
