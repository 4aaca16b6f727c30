//! Service orchestration: wires `ValidatorRegistry` and `PoSEngine` behind
//! the `ConsensusApi` port.

use crate::adapters::ConsensusEventPublisher;
use crate::domain::{
    BlockSigningPayload, ConsensusError, EngineConfig, PoSEngine, RegistryConfig, SignatureMode,
    ValidatorRegistry,
};
use crate::ports::{ConsensusApi, SigningKeySource, TimeSource};
use shared_types::{Address, Hash, PublicKey, Validator, ValidatorStatus};

/// Combined configuration for the validator registry and the PoS engine.
#[derive(Debug, Clone)]
pub struct ConsensusConfig {
    pub registry: RegistryConfig,
    pub engine: EngineConfig,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

/// Default consensus service.
pub struct ConsensusService<T: TimeSource, K: SigningKeySource, P: ConsensusEventPublisher> {
    registry: ValidatorRegistry,
    engine: PoSEngine,
    time_source: T,
    signing_keys: K,
    publisher: P,
}

impl<T: TimeSource, K: SigningKeySource, P: ConsensusEventPublisher> ConsensusService<T, K, P> {
    pub fn new(config: ConsensusConfig, time_source: T, signing_keys: K, publisher: P) -> Self {
        Self {
            registry: ValidatorRegistry::new(config.registry),
            engine: PoSEngine::new(config.engine),
            time_source,
            signing_keys,
            publisher,
        }
    }
}

impl<T: TimeSource, K: SigningKeySource, P: ConsensusEventPublisher> ConsensusApi
    for ConsensusService<T, K, P>
{
    fn add_validator(
        &mut self,
        address: Address,
        public_key: PublicKey,
        stake: u64,
        commission_rate_bps: u32,
    ) -> Result<(), ConsensusError> {
        let now = self.time_source.now();
        self.registry.add(address, public_key, stake, commission_rate_bps, now)
    }

    fn remove_validator(&mut self, address: &Address) -> Result<(), ConsensusError> {
        self.registry.remove(address).map(|_| ())
    }

    fn increase_stake(&mut self, address: &Address, amount: u64) -> Result<u64, ConsensusError> {
        self.registry.increase_stake(address, amount)
    }

    fn decrease_stake(&mut self, address: &Address, amount: u64) -> Result<u64, ConsensusError> {
        self.registry.decrease_stake(address, amount)
    }

    fn penalize(&mut self, address: &Address, amount: u64, _reason: &str) -> Result<(), ConsensusError> {
        let now = self.time_source.now();
        self.registry.penalize(address, amount, now, 0)?;
        if let Some(v) = self.registry.get(address) {
            if v.status == ValidatorStatus::Jailed {
                let _ = self.publisher.publish_validator_status_changed(*address, "jailed");
            }
        }
        Ok(())
    }

    fn reward(&mut self, address: &Address, amount: u64) -> Result<(), ConsensusError> {
        self.registry.reward(address, amount, 0)
    }

    fn active_validators(&mut self) -> Vec<Validator> {
        let now = self.time_source.now();
        self.registry.get_active(now).into_iter().cloned().collect()
    }

    fn select_leader(&mut self, previous_hash: Hash, height: u64) -> Result<Address, ConsensusError> {
        let now = self.time_source.now();
        self.engine.select_leader(&mut self.registry, previous_hash, height, now)
    }

    fn sign_block(
        &mut self,
        payload: &BlockSigningPayload,
        previous_hash: Hash,
        mode: SignatureMode,
        local_node: Address,
    ) -> Result<String, ConsensusError> {
        let now = self.time_source.now();
        let leader = self
            .engine
            .select_leader(&mut self.registry, previous_hash, payload.index, now)?;
        if leader != local_node {
            return Err(ConsensusError::NotLeader {
                node: local_node,
                height: payload.index,
            });
        }
        self.engine.sign_block(
            payload,
            mode,
            self.signing_keys.ecdsa_key(),
            self.signing_keys.hmac_secret(),
        )
    }

    fn verify_block(
        &mut self,
        payload: &BlockSigningPayload,
        signature: &str,
        previous_hash: Hash,
    ) -> Result<(), ConsensusError> {
        let now = self.time_source.now();
        self.engine.verify_block(
            &mut self.registry,
            payload,
            signature,
            previous_hash,
            self.signing_keys.hmac_secret(),
            now,
        )
    }

    fn current_reward(&self, height: u64) -> u64 {
        self.engine.current_reward(height)
    }

    fn advance_epoch(&mut self, height: u64) {
        self.engine.advance(height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::publisher::RecordingPublisher;
    use crate::ports::outbound::{MockSigningKeySource, MockTimeSource};

    fn service(key: qc_crypto::KeyPair) -> ConsensusService<MockTimeSource, MockSigningKeySource, RecordingPublisher> {
        ConsensusService::new(
            ConsensusConfig::default(),
            MockTimeSource(std::sync::atomic::AtomicU64::new(1_000)),
            MockSigningKeySource {
                ecdsa: Some(key),
                hmac: None,
            },
            RecordingPublisher::new(),
        )
    }

    #[test]
    fn only_selected_leader_may_sign() {
        let key = qc_crypto::KeyPair::generate();
        let (address, public_key) = (key.address(), key.public_key());
        let mut svc = service(key);
        svc.add_validator(address, public_key, 20_000, 0).unwrap();

        let other = [9u8; 20];
        let payload = BlockSigningPayload {
            hash: [0u8; 32],
            index: 1,
            timestamp: 1_000,
            previous_hash: [0u8; 32],
            merkle_root: [1u8; 32],
            transactions_count: 0,
            node_id: other,
        };
        let err = svc
            .sign_block(&payload, [0u8; 32], SignatureMode::Ecdsa, other)
            .unwrap_err();
        assert!(matches!(err, ConsensusError::NotLeader { .. }));
    }

    #[test]
    fn penalize_below_minimum_publishes_jailed() {
        let key = qc_crypto::KeyPair::generate();
        let (address, public_key) = (key.address(), key.public_key());
        let mut svc = service(key);
        svc.add_validator(address, public_key, 10_500, 0).unwrap();
        svc.penalize(&address, 10_000, "double-sign").unwrap();
        assert_eq!(svc.publisher.changes.lock().unwrap().len(), 1);
    }
}
