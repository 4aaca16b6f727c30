//! `PoSEngine`: deterministic leader selection and dual-mode block signing.
//!
//! Leader selection maps the active validator set to a cumulative-stake
//! distribution (sorted by descending stake, earliest registration first)
//! and draws a uniform target from a seed derived from the previous block
//! hash and height, so every node reaches the same answer without
//! communication.

use super::errors::ConsensusError;
use super::registry::ValidatorRegistry;
use shared_types::{Address, Hash};
use std::collections::BTreeMap;

/// Block signing switches to HMAC once every validator's secret is shared
/// out-of-band; `signature_mode` decides per call, `allow_hmac_fallback`
/// decides whether HMAC is accepted at all when no ECDSA key is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMode {
    /// `ecdsa:` tagged, recoverable secp256k1 signature.
    Ecdsa,
    /// `hmac_sha256:` tagged, keyed by a network-shared secret.
    HmacSha256,
}

/// Tunable PoS parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Blocks per epoch before `currentEpoch` advances and `blocksProduced`
    /// resets.
    pub epoch_length: u64,
    /// Base block reward, halved every `halving_interval` blocks.
    pub base_reward: u64,
    /// Blocks between reward halvings.
    pub halving_interval: u64,
    /// Whether `hmac_sha256:`-tagged signatures are accepted when no ECDSA
    /// key is configured for the signer.
    pub allow_hmac_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epoch_length: 1_000,
            base_reward: 50,
            halving_interval: 100_000,
            allow_hmac_fallback: true,
        }
    }
}

/// Epoch bookkeeping, advanced by `BlockBuilder`/orchestration after each
/// successful append.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochState {
    /// Current epoch index.
    pub current_epoch: u64,
    /// Blocks produced so far within `current_epoch`.
    pub blocks_produced: u64,
}

/// Fields that go into the canonical, sorted-keys block signing payload.
#[derive(Debug, Clone)]
pub struct BlockSigningPayload {
    pub hash: Hash,
    pub index: u64,
    pub timestamp: u64,
    pub previous_hash: Hash,
    pub merkle_root: Hash,
    pub transactions_count: u32,
    pub node_id: Address,
}

/// Canonicalizes `payload` to whitespace-free, sorted-keys JSON — the exact
/// bytes signed and, later, re-verified.
#[must_use]
pub fn canonical_signing_bytes(payload: &BlockSigningPayload) -> Vec<u8> {
    let mut fields: BTreeMap<&'static str, serde_json::Value> = BTreeMap::new();
    fields.insert("hash", serde_json::Value::String(hex::encode(payload.hash)));
    fields.insert("index", serde_json::Value::Number(payload.index.into()));
    fields.insert("timestamp", serde_json::Value::Number(payload.timestamp.into()));
    fields.insert(
        "previousHash",
        serde_json::Value::String(hex::encode(payload.previous_hash)),
    );
    fields.insert(
        "merkleRoot",
        serde_json::Value::String(hex::encode(payload.merkle_root)),
    );
    fields.insert(
        "transactionsCount",
        serde_json::Value::Number(payload.transactions_count.into()),
    );
    fields.insert(
        "signatureVersion",
        serde_json::Value::String("1.0".to_string()),
    );
    fields.insert("nodeId", serde_json::Value::String(hex::encode(payload.node_id)));
    serde_json::to_vec(&fields).expect("BTreeMap<&str, Value> always serializes")
}

/// Leader selection and signing, over a live `ValidatorRegistry`.
pub struct PoSEngine {
    config: EngineConfig,
    epoch: EpochState,
}

impl PoSEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            epoch: EpochState::default(),
        }
    }

    #[must_use]
    pub fn epoch(&self) -> EpochState {
        self.epoch
    }

    /// Selects the leader for the block following `previous_hash` at
    /// `height`, over the registry's current active set.
    ///
    /// `seed = digest(previousHash || index)`; the first 8 bytes normalize
    /// to a uniform draw in `[0, 1)`, scaled by total active stake to pick
    /// a target, then walked against the cumulative-stake prefix sums
    /// (sorted by descending stake, earliest registration as tie-break)
    /// to find the smallest validator whose prefix covers the target.
    pub fn select_leader(
        &self,
        registry: &mut ValidatorRegistry,
        previous_hash: Hash,
        height: u64,
        now: u64,
    ) -> Result<Address, ConsensusError> {
        let active = registry.get_active(now);
        if active.is_empty() {
            return Err(ConsensusError::NoActiveValidators);
        }

        let mut seed_input = Vec::with_capacity(40);
        seed_input.extend_from_slice(&previous_hash);
        seed_input.extend_from_slice(&height.to_be_bytes());
        let seed = qc_crypto::digest(&seed_input);

        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&seed[..8]);
        let uniform = u64::from_be_bytes(seed_bytes) as f64 / u64::MAX as f64;

        let total_stake: u64 = active.iter().map(|v| v.stake).sum();
        let target = (uniform * total_stake as f64) as u64;

        let mut cumulative: u64 = 0;
        for validator in &active {
            cumulative += validator.stake;
            if cumulative > target {
                return Ok(validator.address);
            }
        }
        // Rounding can leave target == total_stake exactly; fall back to
        // the last validator in the ordering.
        Ok(active.last().expect("checked non-empty above").address)
    }

    /// Signs a block's canonical payload, tagging the output by mode.
    /// `ecdsa_key` is `Some` when the local node holds a secp256k1 key for
    /// `signer`; `hmac_secret` is the network-shared fallback key.
    pub fn sign_block(
        &self,
        payload: &BlockSigningPayload,
        mode: SignatureMode,
        ecdsa_key: Option<&qc_crypto::KeyPair>,
        hmac_secret: Option<&[u8]>,
    ) -> Result<String, ConsensusError> {
        let bytes = canonical_signing_bytes(payload);
        match mode {
            SignatureMode::Ecdsa => {
                let key = ecdsa_key.ok_or(ConsensusError::NoSigningKey(payload.node_id))?;
                let sig = key
                    .sign(&bytes)
                    .map_err(|e| ConsensusError::Internal(e.to_string()))?;
                Ok(format!("ecdsa:{}", hex::encode(sig)))
            }
            SignatureMode::HmacSha256 => {
                if !self.config.allow_hmac_fallback {
                    return Err(ConsensusError::NoSigningKey(payload.node_id));
                }
                let secret = hmac_secret.ok_or(ConsensusError::NoSigningKey(payload.node_id))?;
                let tag = qc_crypto::hmac_sha256(secret, &bytes);
                Ok(format!("hmac_sha256:{}", hex::encode(tag)))
            }
        }
    }

    /// Verifies a tagged block signature, dispatching on its prefix, then
    /// confirms the signer was in fact the validator leader-selection would
    /// have chosen for this height.
    pub fn verify_block(
        &self,
        registry: &mut ValidatorRegistry,
        payload: &BlockSigningPayload,
        signature: &str,
        previous_hash: Hash,
        hmac_secret: Option<&[u8]>,
        now: u64,
    ) -> Result<(), ConsensusError> {
        let bytes = canonical_signing_bytes(payload);
        let claimed_signer = if let Some(hex_sig) = signature.strip_prefix("ecdsa:") {
            let sig_bytes = hex::decode(hex_sig).map_err(|_| ConsensusError::MalformedSignature)?;
            let mut sig = [0u8; 65];
            if sig_bytes.len() != 65 {
                return Err(ConsensusError::MalformedSignature);
            }
            sig.copy_from_slice(&sig_bytes);
            qc_crypto::recover_address(&bytes, &sig)
                .map_err(|_| ConsensusError::InvalidSignature(payload.index))?
        } else if let Some(hex_tag) = signature.strip_prefix("hmac_sha256:") {
            if !self.config.allow_hmac_fallback {
                return Err(ConsensusError::InvalidSignature(payload.index));
            }
            let secret = hmac_secret.ok_or(ConsensusError::NoSigningKey(payload.node_id))?;
            let tag_bytes = hex::decode(hex_tag).map_err(|_| ConsensusError::MalformedSignature)?;
            let mut tag = [0u8; 32];
            if tag_bytes.len() != 32 {
                return Err(ConsensusError::MalformedSignature);
            }
            tag.copy_from_slice(&tag_bytes);
            if !qc_crypto::hmac_sha256_verify(secret, &bytes, &tag) {
                return Err(ConsensusError::InvalidSignature(payload.index));
            }
            payload.node_id
        } else {
            return Err(ConsensusError::MalformedSignature);
        };

        let expected_leader = self.select_leader(registry, previous_hash, payload.index, now)?;
        if claimed_signer != expected_leader || payload.node_id != expected_leader {
            return Err(ConsensusError::WrongSigner {
                signer: claimed_signer,
                height: payload.index,
            });
        }
        Ok(())
    }

    /// Current per-block reward, halved every `halving_interval` blocks,
    /// floored once halved past zero.
    #[must_use]
    pub fn current_reward(&self, height: u64) -> u64 {
        let halvings = height / self.config.halving_interval;
        if halvings >= 64 {
            return 0;
        }
        self.config.base_reward >> halvings
    }

    /// Advances epoch bookkeeping after a block at `height` was appended.
    pub fn advance(&mut self, height: u64) {
        self.epoch.blocks_produced += 1;
        if height > 0 && height % self.config.epoch_length == 0 {
            self.epoch.current_epoch += 1;
            self.epoch.blocks_produced = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::RegistryConfig;

    fn addr(b: u8) -> Address {
        [b; 20]
    }

    fn registry_with_two() -> ValidatorRegistry {
        let mut r = ValidatorRegistry::new(RegistryConfig {
            minimum_stake: 100,
            cooldown_seconds: 0,
        });
        r.add(addr(1), [0u8; 33], 1_000, 0, 1).unwrap();
        r.add(addr(2), [0u8; 33], 3_000, 0, 2).unwrap();
        r
    }

    #[test]
    fn leader_selection_is_deterministic() {
        let mut registry = registry_with_two();
        let engine = PoSEngine::new(EngineConfig::default());
        let a = engine.select_leader(&mut registry, [7u8; 32], 10, 100).unwrap();
        let b = engine.select_leader(&mut registry, [7u8; 32], 10, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ecdsa_sign_then_verify_round_trips() {
        let mut registry = ValidatorRegistry::new(RegistryConfig {
            minimum_stake: 100,
            cooldown_seconds: 0,
        });
        let key = qc_crypto::KeyPair::generate();
        registry.add(key.address(), key.public_key(), 1_000, 0, 1).unwrap();

        let engine = PoSEngine::new(EngineConfig::default());
        let payload = BlockSigningPayload {
            hash: [1u8; 32],
            index: 1,
            timestamp: 1_000,
            previous_hash: [0u8; 32],
            merkle_root: [2u8; 32],
            transactions_count: 0,
            node_id: key.address(),
        };
        let signature = engine
            .sign_block(&payload, SignatureMode::Ecdsa, Some(&key), None)
            .unwrap();
        assert!(signature.starts_with("ecdsa:"));
        engine
            .verify_block(&mut registry, &payload, &signature, [0u8; 32], None, 1_000)
            .unwrap();
    }

    #[test]
    fn reward_halves_on_schedule() {
        let engine = PoSEngine::new(EngineConfig::default());
        assert_eq!(engine.current_reward(0), 50);
        assert_eq!(engine.current_reward(100_000), 25);
        assert_eq!(engine.current_reward(200_000), 12);
    }

    #[test]
    fn epoch_advances_and_resets_block_count() {
        let mut engine = PoSEngine::new(EngineConfig {
            epoch_length: 2,
            ..EngineConfig::default()
        });
        engine.advance(1);
        assert_eq!(engine.epoch().current_epoch, 0);
        engine.advance(2);
        assert_eq!(engine.epoch().current_epoch, 1);
        assert_eq!(engine.epoch().blocks_produced, 0);
    }
}
