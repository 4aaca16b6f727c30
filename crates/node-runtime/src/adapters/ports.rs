//! Concrete adapters implementing each subsystem's outbound ports against
//! a sibling subsystem's inbound API. `node-runtime` is the one crate in
//! the workspace allowed to know about more than one subsystem at a time;
//! every adapter here hides that behind the port trait the owning crate
//! already defined.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use shared_bus::BlockchainEvent;
use shared_types::ipc::TxReceivedPayload;
use shared_types::{Address, Block, Hash};
use tokio::sync::mpsc;

/// Bridges the mempool service to `qc-block-builder`'s `MempoolPort` and
/// `qc-raw-ingestor`'s `MempoolSink`. Cheap to clone: every field is
/// itself `Arc`-backed, so the block builder and the raw ingestor can
/// each own an independent handle onto the same mempool and nonce table.
#[derive(Clone)]
pub struct MempoolAdapter {
    pub(crate) mempool: Arc<RwLock<dyn qc_mempool::ports::MempoolApi>>,
    pub(crate) nonces: Arc<RwLock<HashMap<Address, u64>>>,
    bus: mpsc::UnboundedSender<BlockchainEvent>,
}

impl MempoolAdapter {
    pub fn new(
        mempool: Arc<RwLock<dyn qc_mempool::ports::MempoolApi>>,
        nonces: Arc<RwLock<HashMap<Address, u64>>>,
        bus: mpsc::UnboundedSender<BlockchainEvent>,
    ) -> Self {
        Self { mempool, nonces, bus }
    }

    /// Records the confirmed nonce for each sender in `block`, so a later
    /// `NonceProvider::last_confirmed_nonce` reflects this block's effect.
    /// There is no separate account-state subsystem in this workspace;
    /// nonce tracking lives here rather than be invented as one.
    pub fn record_confirmed(&self, block: &Block) {
        let mut nonces = self.nonces.write().unwrap_or_else(|e| e.into_inner());
        for tx in &block.transactions {
            let entry = nonces.entry(tx.from).or_insert(0);
            if tx.nonce > *entry {
                *entry = tx.nonce;
            }
        }
    }
}

impl qc_block_builder::MempoolPort for MempoolAdapter {
    fn get_batch(&self, max_count: usize) -> Vec<shared_types::Transaction> {
        self.mempool
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get_batch(max_count)
            .into_iter()
            .map(|pooled| pooled.entry.tx)
            .collect()
    }

    fn remove(&mut self, tx_hashes: &[Hash]) {
        self.mempool.write().unwrap_or_else(|e| e.into_inner()).remove(tx_hashes);
    }
}

impl qc_raw_ingestor::MempoolSink for MempoolAdapter {
    fn submit(&mut self, tx: shared_types::Transaction) -> Result<Hash, qc_raw_ingestor::MempoolSinkError> {
        let hash = self
            .mempool
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .add_transaction(tx.clone())
            .map_err(|e| qc_raw_ingestor::MempoolSinkError(e.to_string()))?;
        // `MempoolSink` only carries the decoded transaction, not the raw
        // submission's own hash; the raw hash collapses to the decoded
        // transaction's hash for this bus event.
        let _ = self.bus.send(BlockchainEvent::TxReceived(TxReceivedPayload {
            tx,
            raw_tx_hash: hash,
        }));
        Ok(hash)
    }
}

/// Supplies the local node's signing key material to `qc-consensus`.
pub struct SigningKeyAdapter {
    ecdsa: Option<qc_crypto::KeyPair>,
    hmac: Option<Vec<u8>>,
}

impl SigningKeyAdapter {
    pub fn new(ecdsa: Option<qc_crypto::KeyPair>, hmac: Option<Vec<u8>>) -> Self {
        Self { ecdsa, hmac }
    }
}

impl qc_consensus::SigningKeySource for SigningKeyAdapter {
    fn ecdsa_key(&self) -> Option<&qc_crypto::KeyPair> {
        self.ecdsa.as_ref()
    }

    fn hmac_secret(&self) -> Option<&[u8]> {
        self.hmac.as_deref()
    }
}

/// Bridges `qc-consensus` to `qc-block-builder`'s `ConsensusPort`.
pub struct ConsensusAdapter {
    pub(crate) consensus: Arc<RwLock<dyn qc_consensus::ConsensusApi>>,
    pub(crate) local_node: Address,
    pub(crate) has_ecdsa_key: bool,
}

impl ConsensusAdapter {
    pub fn new(consensus: Arc<RwLock<dyn qc_consensus::ConsensusApi>>, local_node: Address, has_ecdsa_key: bool) -> Self {
        Self {
            consensus,
            local_node,
            has_ecdsa_key,
        }
    }
}

impl qc_block_builder::ConsensusPort for ConsensusAdapter {
    fn select_leader(&mut self, previous_hash: Hash, height: u64) -> Result<Address, String> {
        self.consensus
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .select_leader(previous_hash, height)
            .map_err(|e| e.to_string())
    }

    fn sign_block(&mut self, request: &qc_block_builder::SigningRequest) -> Result<String, String> {
        let payload = qc_consensus::BlockSigningPayload {
            hash: request.hash,
            index: request.index,
            timestamp: request.timestamp,
            previous_hash: request.previous_hash,
            merkle_root: request.merkle_root,
            transactions_count: request.transactions_count,
            node_id: request.node_id,
        };
        let mode = if self.has_ecdsa_key {
            qc_consensus::SignatureMode::Ecdsa
        } else {
            qc_consensus::SignatureMode::HmacSha256
        };
        self.consensus
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .sign_block(&payload, request.previous_hash, mode, self.local_node)
            .map_err(|e| e.to_string())
    }
}

/// Bridges `qc-chain-store` to `qc-block-builder`'s `ChainStorePort`.
///
/// Stages each appended block into the `block_builder_publisher` right
/// before `BlockBuilderService::pack` invokes `publish_block_created`,
/// since that port only carries `(hash, index)`.
pub struct ChainStoreAdapter {
    pub(crate) store: Arc<RwLock<dyn qc_chain_store::ChainStoreApi>>,
    pub(crate) staging: Arc<super::bus::block_builder_publisher::BlockBuilderBusPublisher>,
}

impl ChainStoreAdapter {
    pub fn new(
        store: Arc<RwLock<dyn qc_chain_store::ChainStoreApi>>,
        staging: Arc<super::bus::block_builder_publisher::BlockBuilderBusPublisher>,
    ) -> Self {
        Self { store, staging }
    }
}

impl qc_block_builder::ChainStorePort for ChainStoreAdapter {
    fn latest_height(&self) -> u64 {
        self.store.read().unwrap_or_else(|e| e.into_inner()).height_of().unwrap_or(0)
    }

    fn latest_hash(&self) -> Hash {
        self.store
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .latest()
            .ok()
            .flatten()
            .map(|b| b.hash)
            .unwrap_or(shared_types::ZERO_HASH)
    }

    fn append(&mut self, block: Block) -> Result<(), String> {
        self.staging.stage(block.clone());
        self.store.write().unwrap_or_else(|e| e.into_inner()).append(block).map_err(|e| e.to_string())
    }
}

/// Delegates `qc-chain-store`'s `BlockValidator` to `qc-block-builder`'s
/// pure Merkle helper and `qc-consensus`'s signature check.
pub struct ConsensusBlockValidator {
    consensus: Arc<RwLock<dyn qc_consensus::ConsensusApi>>,
}

impl ConsensusBlockValidator {
    pub fn new(consensus: Arc<RwLock<dyn qc_consensus::ConsensusApi>>) -> Self {
        Self { consensus }
    }
}

impl qc_chain_store::BlockValidator for ConsensusBlockValidator {
    fn merkle_root_matches(&self, block: &Block) -> bool {
        qc_block_builder::merkle_root(&block.transactions) == block.merkle_root
    }

    fn signature_valid(&self, block: &Block) -> bool {
        let payload = qc_consensus::BlockSigningPayload {
            hash: block.hash,
            index: block.index,
            timestamp: block.timestamp,
            previous_hash: block.parent_hash,
            merkle_root: block.merkle_root,
            transactions_count: block.transactions_count,
            node_id: block.validator_address,
        };
        self.consensus
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .verify_block(&payload, &block.signature, block.parent_hash)
            .is_ok()
    }
}

/// Bridges `qc-peer-registry` to `qc-resilience`'s `PeerStatsSource` and
/// `qc-event-sync`'s `PeerDirectory`. Cheap to clone: both subsystems need
/// their own owned handle at construction time, and every field here is
/// itself `Arc`-backed.
#[derive(Clone)]
pub struct PeerRegistryAdapter {
    pub(crate) registry: Arc<RwLock<dyn qc_peer_registry::PeerRegistryApi>>,
    /// Last height reported by each peer, fed by observed `Heartbeat` and
    /// `SyncResponse` bus events. Not tracked by `qc-peer-registry` itself.
    pub(crate) heights: Arc<RwLock<HashMap<String, u64>>>,
}

impl PeerRegistryAdapter {
    pub fn new(registry: Arc<RwLock<dyn qc_peer_registry::PeerRegistryApi>>) -> Self {
        Self {
            registry,
            heights: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn record_height(&self, node_id: &str, height: u64) {
        self.heights
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(node_id.to_string(), height);
    }
}

impl qc_resilience::PeerStatsSource for PeerRegistryAdapter {
    fn active_peer_heights(&self) -> Vec<qc_resilience::PeerHeight> {
        let heights = self.heights.read().unwrap_or_else(|e| e.into_inner());
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .list(Some(shared_types::PeerStatus::Active))
            .into_iter()
            .filter_map(|peer| {
                heights.get(&peer.node_id).map(|&height| qc_resilience::PeerHeight {
                    node_id: peer.node_id.clone(),
                    height,
                    reputation_score: peer.reputation_score,
                })
            })
            .collect()
    }

    fn active_peer_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .list(Some(shared_types::PeerStatus::Active))
            .len()
    }

    fn avg_response_time_secs(&self) -> f64 {
        0.0
    }

    fn recent_failure_count(&self) -> u32 {
        0
    }
}

impl qc_event_sync::PeerDirectory for PeerRegistryAdapter {
    fn broadcastable_peers(&self) -> Vec<String> {
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .list(Some(shared_types::PeerStatus::Active))
            .into_iter()
            .map(|peer| peer.node_id)
            .collect()
    }
}

/// Bridges `qc-resilience`'s breaker directly onto `qc-event-sync`'s
/// `CircuitGate` — both ports share the same `(peer_id, operation)` shape.
pub struct CircuitGateAdapter {
    resilience: Arc<RwLock<dyn qc_resilience::ResilienceApi>>,
}

impl CircuitGateAdapter {
    pub fn new(resilience: Arc<RwLock<dyn qc_resilience::ResilienceApi>>) -> Self {
        Self { resilience }
    }
}

impl qc_event_sync::CircuitGate for CircuitGateAdapter {
    fn allow_request(&self, peer_id: &str, operation: &str) -> bool {
        self.resilience.write().unwrap_or_else(|e| e.into_inner()).allow_request(peer_id, operation)
    }

    fn record_success(&mut self, peer_id: &str, operation: &str) {
        self.resilience.write().unwrap_or_else(|e| e.into_inner()).record_success(peer_id, operation);
    }

    fn record_failure(&mut self, peer_id: &str, operation: &str) {
        self.resilience.write().unwrap_or_else(|e| e.into_inner()).record_failure(peer_id, operation);
    }
}

/// Devnet broadcast transport: no real network stack is wired into this
/// workspace, so outbound delivery is logged rather than sent. A
/// production deployment replaces this with an HTTP client adapter behind
/// the same `BroadcastTransport` port.
#[derive(Debug, Clone, Default)]
pub struct LoggingBroadcastTransport;

impl qc_event_sync::BroadcastTransport for LoggingBroadcastTransport {
    fn send(
        &self,
        peer_id: &str,
        event: &qc_event_sync::Event,
        signature_hex: &str,
    ) -> Result<(), qc_event_sync::TransportError> {
        tracing::debug!(peer = peer_id, event_id = %event.id, signature = signature_hex, "broadcast (devnet loopback)");
        Ok(())
    }
}

/// Feeds `qc-mempool` the last confirmed nonce per sender out of the same
/// table `MempoolAdapter::record_confirmed` writes into after each append.
#[derive(Clone)]
pub struct NonceTracker {
    nonces: Arc<RwLock<HashMap<Address, u64>>>,
}

impl NonceTracker {
    pub fn new(nonces: Arc<RwLock<HashMap<Address, u64>>>) -> Self {
        Self { nonces }
    }
}

impl qc_mempool::ports::NonceProvider for NonceTracker {
    fn last_confirmed_nonce(&self, address: &Address) -> Result<u64, qc_mempool::MempoolError> {
        Ok(self.nonces.read().unwrap_or_else(|e| e.into_inner()).get(address).copied().unwrap_or(0))
    }
}
