//! Constructs and wires the eight subsystem services behind the adapters
//! in `crate::adapters`, then seeds the genesis block before the node
//! accepts any peer or client traffic.
//!
//! ## Genesis signing
//!
//! The genesis block is built, then actually signed through the same
//! consensus path a normal block takes: its validators are registered
//! first, the (sole, for a single-validator devnet) leader is selected
//! for `(ZERO_HASH, height 0)`, and that leader signs the block's real
//! signing payload. `ChainStore::append` then validates genesis exactly
//! like any other block — no bypass is needed.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use shared_bus::InMemoryEventBus;
use shared_types::{Address, ZERO_HASH};
use tokio::task::JoinHandle;

use qc_block_builder::BlockBuilderService;
use qc_chain_store::{ChainStore, ChainStoreApi, ChainStoreService};
use qc_consensus::{ConsensusApi, ConsensusService, SignatureMode};
use qc_event_sync::EventSyncService;
use qc_mempool::MempoolService;
use qc_peer_registry::{PeerRegistryApi, PeerRegistryService};
use qc_raw_ingestor::RawIngestorService;
use qc_resilience::{ResilienceApi, ResilienceService};

use crate::adapters::bus::{
    block_builder_publisher::BlockBuilderBusPublisher, chain_store_publisher::ChainStoreBusPublisher,
    consensus_publisher::ConsensusBusPublisher, ingest_publisher::IngestBusPublisher,
    peer_registry_publisher::PeerRegistryBusPublisher, resilience_publisher::ResilienceBusPublisher,
    spawn_bus_forwarder,
};
use crate::adapters::ports::{
    ChainStoreAdapter, CircuitGateAdapter, ConsensusAdapter, ConsensusBlockValidator, LoggingBroadcastTransport,
    MempoolAdapter, NonceTracker, PeerRegistryAdapter, SigningKeyAdapter,
};
use crate::container::config::NodeConfig;
use crate::genesis::GenesisBuilder;

type BlockBuilder = BlockBuilderService<
    MempoolAdapter,
    ConsensusAdapter,
    ChainStoreAdapter,
    qc_block_builder::SystemTimeSource,
    Arc<BlockBuilderBusPublisher>,
>;

type RawIngestor = RawIngestorService<MempoolAdapter, IngestBusPublisher>;

type EventSync = EventSyncService<qc_event_sync::SystemTimeSource, CircuitGateAdapter, PeerRegistryAdapter>;

/// Errors that can occur while assembling the node.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("genesis construction failed: {0}")]
    Genesis(#[from] crate::genesis::GenesisError),
    #[error("genesis validator registration failed: {0}")]
    ValidatorRegistration(String),
    #[error("genesis leader selection failed: {0}")]
    LeaderSelection(String),
    #[error("genesis signing failed: {0}")]
    Signing(String),
    #[error("genesis append failed: {0}")]
    Append(String),
}

/// Holds every subsystem service, wired through the adapters in
/// `crate::adapters`, plus the shared event bus and its forwarder task.
pub struct SubsystemContainer {
    pub mempool: Arc<RwLock<dyn qc_mempool::ports::MempoolApi>>,
    pub consensus: Arc<RwLock<dyn ConsensusApi>>,
    pub chain_store: Arc<RwLock<dyn ChainStoreApi>>,
    pub resilience: Arc<RwLock<dyn ResilienceApi>>,
    pub peer_registry: Arc<RwLock<dyn PeerRegistryApi>>,
    pub block_builder: RwLock<BlockBuilder>,
    pub raw_ingestor: RwLock<RawIngestor>,
    pub event_sync: RwLock<EventSync>,
    pub broadcast_transport: LoggingBroadcastTransport,
    pub mempool_adapter: MempoolAdapter,
    pub peer_registry_adapter: PeerRegistryAdapter,
    pub event_bus: Arc<InMemoryEventBus>,
    pub local_node_id: Address,
    _bus_forwarder: JoinHandle<()>,
}

impl SubsystemContainer {
    /// Builds every subsystem, registers the genesis validator set, signs
    /// and appends the genesis block, and returns the assembled node.
    pub fn build(config: NodeConfig, node_keypair: qc_crypto::KeyPair) -> Result<Self, StartupError> {
        let local_node_id = node_keypair.address();

        let event_bus = Arc::new(InMemoryEventBus::new());
        let (bus_tx, bus_forwarder) = spawn_bus_forwarder(Arc::clone(&event_bus));

        // --- consensus ---
        let signing_keys = SigningKeyAdapter::new(Some(node_keypair.clone()), Some(config.security.hmac_secret.to_vec()));
        let consensus_service = ConsensusService::new(
            config.consensus.clone(),
            qc_consensus::SystemTimeSource,
            signing_keys,
            ConsensusBusPublisher,
        );
        let consensus: Arc<RwLock<dyn ConsensusApi>> = Arc::new(RwLock::new(consensus_service));

        // --- genesis: register validators, sign, append ---
        let genesis_config = if config.genesis.initial_validators.is_empty() {
            crate::genesis::GenesisConfig::devnet(node_keypair.public_key(), config.consensus.registry.minimum_stake)
        } else {
            config.genesis.clone()
        };
        let (mut genesis_block, genesis_validators) = GenesisBuilder::new(genesis_config).build()?;

        for validator in &genesis_validators {
            consensus
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .add_validator(validator.address, validator.public_key, validator.stake, validator.commission_rate_bps)
                .map_err(|e| StartupError::ValidatorRegistration(e.to_string()))?;
        }

        let leader = consensus
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .select_leader(ZERO_HASH, 0)
            .map_err(|e| StartupError::LeaderSelection(e.to_string()))?;

        genesis_block.validator_address = leader;
        let genesis_payload = qc_consensus::BlockSigningPayload {
            hash: genesis_block.hash,
            index: genesis_block.index,
            timestamp: genesis_block.timestamp,
            previous_hash: ZERO_HASH,
            merkle_root: genesis_block.merkle_root,
            transactions_count: genesis_block.transactions_count,
            node_id: leader,
        };
        genesis_block.signature = consensus
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .sign_block(&genesis_payload, ZERO_HASH, SignatureMode::Ecdsa, leader)
            .map_err(|e| StartupError::Signing(e.to_string()))?;

        // --- chain store ---
        std::fs::create_dir_all(&config.storage.data_dir).map_err(|e| StartupError::Append(e.to_string()))?;
        let kv = qc_chain_store::adapters::FileBackedKVStore::new(config.storage.data_dir.join("chainstore.bin"));
        let fs = qc_chain_store::adapters::OsFileSystemAdapter::new(&config.storage.data_dir);
        let block_validator = ConsensusBlockValidator::new(Arc::clone(&consensus));
        let chain_store_domain =
            ChainStore::open(kv, block_validator).map_err(|e| StartupError::Append(e.to_string()))?;
        let chain_store_service =
            ChainStoreService::new(chain_store_domain, fs, ChainStoreBusPublisher::new(bus_tx.clone()));
        let chain_store: Arc<RwLock<dyn ChainStoreApi>> = Arc::new(RwLock::new(chain_store_service));

        if chain_store.read().unwrap_or_else(|e| e.into_inner()).height_of().is_none() {
            chain_store
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .append(genesis_block)
                .map_err(|e| StartupError::Append(e.to_string()))?;
        }

        // --- mempool ---
        let nonces = Arc::new(RwLock::new(HashMap::new()));
        let nonce_tracker = NonceTracker::new(Arc::clone(&nonces));
        let mempool_service =
            MempoolService::new(config.mempool.clone(), qc_mempool::ports::SystemTimeSource, nonce_tracker);
        let mempool: Arc<RwLock<dyn qc_mempool::ports::MempoolApi>> = Arc::new(RwLock::new(mempool_service));
        let mempool_adapter = MempoolAdapter::new(Arc::clone(&mempool), Arc::clone(&nonces), bus_tx.clone());

        // --- peer registry ---
        let peer_registry_service = PeerRegistryService::new(
            config.peer_registry.clone(),
            qc_peer_registry::SystemTimeSource,
            PeerRegistryBusPublisher::new(bus_tx.clone()),
        );
        let peer_registry: Arc<RwLock<dyn PeerRegistryApi>> = Arc::new(RwLock::new(peer_registry_service));
        let peer_registry_adapter = PeerRegistryAdapter::new(Arc::clone(&peer_registry));

        // --- resilience ---
        let resilience_service = ResilienceService::new(
            config.resilience.clone(),
            qc_resilience::SystemTimeSource,
            peer_registry_adapter.clone(),
            ResilienceBusPublisher::new(bus_tx.clone()),
        );
        let resilience: Arc<RwLock<dyn ResilienceApi>> = Arc::new(RwLock::new(resilience_service));

        // --- block builder ---
        let staging = Arc::new(BlockBuilderBusPublisher::new(bus_tx.clone()));
        let block_builder = BlockBuilderService::new(
            mempool_adapter.clone(),
            ConsensusAdapter::new(Arc::clone(&consensus), local_node_id, true),
            ChainStoreAdapter::new(Arc::clone(&chain_store), Arc::clone(&staging)),
            qc_block_builder::SystemTimeSource,
            staging,
        );

        // --- raw ingestor ---
        let raw_ingestor = RawIngestorService::new(mempool_adapter.clone(), IngestBusPublisher::new(bus_tx.clone()));

        // --- event sync ---
        let event_sync = EventSyncService::new(
            config.identity.node_id.clone(),
            config.security.hmac_secret.to_vec(),
            config.event_sync.queue_high_water_mark,
            qc_event_sync::SystemTimeSource,
            CircuitGateAdapter::new(Arc::clone(&resilience)),
            peer_registry_adapter.clone(),
        );

        Ok(Self {
            mempool,
            consensus,
            chain_store,
            resilience,
            peer_registry,
            block_builder: RwLock::new(block_builder),
            raw_ingestor: RwLock::new(raw_ingestor),
            event_sync: RwLock::new(event_sync),
            broadcast_transport: LoggingBroadcastTransport,
            mempool_adapter,
            peer_registry_adapter,
            event_bus,
            local_node_id,
            _bus_forwarder: bus_forwarder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devnet_node_boots_with_genesis_appended() {
        let config = NodeConfig::default();
        let keypair = qc_crypto::KeyPair::generate();
        let container = SubsystemContainer::build(config, keypair).expect("devnet node should assemble cleanly");
        let height = container.chain_store.read().unwrap().height_of();
        assert_eq!(height, Some(0));
        let genesis = container.chain_store.read().unwrap().by_index(0).expect("genesis block present");
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.validator_address, container.local_node_id);
    }
}
