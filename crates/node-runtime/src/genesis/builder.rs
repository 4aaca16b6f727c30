//! # Genesis Block Builder
//!
//! Creates the height-0 block that seeds `ChainStore` before the node
//! starts accepting peer blocks.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use qc_block_builder::block_hash;
use shared_types::{Address, Block, PublicKey, Validator, ValidatorStatus, ZERO_HASH};
use thiserror::Error;

/// Genesis block creation errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// Validator and stake lists have different lengths.
    #[error("initial_validators and initial_stakes must have the same length")]
    MismatchedValidatorStakes,
    /// Address derivation failed for a configured public key.
    #[error("invalid validator public key: {0}")]
    InvalidPublicKey(String),
}

/// Genesis block configuration.
#[derive(Debug, Clone)]
pub struct GenesisConfig {
    /// Genesis timestamp (Unix seconds). `None` uses current time.
    pub timestamp: Option<u64>,
    /// Initial validator public keys (compressed secp256k1, 33 bytes).
    pub initial_validators: Vec<PublicKey>,
    /// Stake assigned to each entry in `initial_validators`, same order.
    pub initial_stakes: Vec<u64>,
    /// Free-form metadata carried on the genesis block.
    pub metadata: BTreeMap<String, String>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            timestamp: None,
            initial_validators: Vec::new(),
            initial_stakes: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }
}

impl GenesisConfig {
    /// A single-validator devnet configuration.
    #[must_use]
    pub fn devnet(validator_pubkey: PublicKey, stake: u64) -> Self {
        Self {
            initial_validators: vec![validator_pubkey],
            initial_stakes: vec![stake],
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), GenesisError> {
        if self.initial_validators.len() != self.initial_stakes.len() {
            return Err(GenesisError::MismatchedValidatorStakes);
        }
        Ok(())
    }
}

/// Builds the genesis block and the matching initial validator set.
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    #[must_use]
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// Builds the genesis block (height 0, empty transaction set) and the
    /// `Validator` entries `qc-consensus`'s registry should be seeded with.
    pub fn build(self) -> Result<(Block, Vec<Validator>), GenesisError> {
        self.config.validate()?;

        let timestamp = self.config.timestamp.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

        let mut validators = Vec::with_capacity(self.config.initial_validators.len());
        for (public_key, stake) in self.config.initial_validators.iter().zip(&self.config.initial_stakes) {
            let address = qc_crypto::address_from_public_key(public_key)
                .map_err(|e| GenesisError::InvalidPublicKey(e.to_string()))?;
            validators.push(Validator {
                address,
                public_key: *public_key,
                stake: *stake,
                status: ValidatorStatus::Active,
                commission_rate_bps: 0,
                blocks_produced: 0,
                blocks_missed: 0,
                penalties_count: 0,
                last_activity_block: 0,
                registered_at: timestamp,
                cooldown_until: 0,
                rewards_ledger: 0,
            });
        }

        let validator_address: Address = validators.first().map(|v| v.address).unwrap_or([0u8; 20]);
        let merkle_root = ZERO_HASH;
        let hash = block_hash(0, ZERO_HASH, timestamp, merkle_root, validator_address, 0);

        let block = Block {
            index: 0,
            parent_hash: ZERO_HASH,
            timestamp,
            validator_address,
            signature: "genesis:none".to_string(),
            merkle_root,
            transactions_count: 0,
            transactions: Vec::new(),
            metadata: self.config.metadata,
            hash,
        };

        Ok((block, validators))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_with_no_validators_is_deterministic() {
        let config = GenesisConfig {
            timestamp: Some(1_700_000_000),
            ..GenesisConfig::default()
        };
        let (block1, _) = GenesisBuilder::new(config.clone()).build().unwrap();
        let (block2, _) = GenesisBuilder::new(config).build().unwrap();
        assert_eq!(block1.hash, block2.hash);
        assert_eq!(block1.index, 0);
        assert_eq!(block1.parent_hash, ZERO_HASH);
    }

    #[test]
    fn genesis_with_validator_derives_address() {
        let keypair = qc_crypto::KeyPair::generate();
        let config = GenesisConfig::devnet(keypair.public_key(), 1_000_000);
        let (block, validators) = GenesisBuilder::new(config).build().unwrap();
        assert_eq!(validators.len(), 1);
        assert_eq!(validators[0].address, keypair.address());
        assert_eq!(block.validator_address, keypair.address());
    }

    #[test]
    fn mismatched_validator_stakes_rejected() {
        let config = GenesisConfig {
            initial_validators: vec![[0u8; 33]],
            initial_stakes: vec![],
            ..GenesisConfig::default()
        };
        assert!(matches!(
            GenesisBuilder::new(config).build(),
            Err(GenesisError::MismatchedValidatorStakes)
        ));
    }
}
