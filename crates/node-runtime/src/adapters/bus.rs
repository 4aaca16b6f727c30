//! Bridges each subsystem's synchronous `*EventPublisher` port to the
//! async `shared_bus::InMemoryEventBus`.
//!
//! Every subsystem publishes with a plain `fn(&self, ...) -> Result<(),
//! PublishError>` call, made from inside domain methods that themselves
//! hold a lock. `InMemoryEventBus::publish` is `async`, so a publisher
//! adapter cannot simply await it in place without risking a block on a
//! lock some other task needs. Instead each adapter hands its event to an
//! unbounded channel; one background task per node drains the channel and
//! awaits `bus.publish` in order.

use std::sync::Arc;

use shared_bus::{BlockchainEvent, InMemoryEventBus};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawns the forwarding task and returns the sender adapters clone from.
pub fn spawn_bus_forwarder(
    bus: Arc<InMemoryEventBus>,
) -> (mpsc::UnboundedSender<BlockchainEvent>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<BlockchainEvent>();
    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(err) = bus.publish(event).await {
                tracing::warn!(error = %err, "failed to forward event onto shared bus");
            }
        }
    });
    (tx, handle)
}

/// Generic publish-error a dropped/closed forwarder channel maps to,
/// shared by the per-subsystem wrappers below.
pub(crate) fn send_or_not_connected<E>(
    sender: &mpsc::UnboundedSender<BlockchainEvent>,
    event: BlockchainEvent,
    not_connected: impl FnOnce() -> E,
) -> Result<(), E> {
    sender.send(event).map_err(|_| not_connected())
}

pub mod ingest_publisher {
    use super::*;
    use qc_raw_ingestor::{IngestEventPublisher, PublishError};
    use shared_types::Hash;

    pub struct IngestBusPublisher {
        sender: mpsc::UnboundedSender<BlockchainEvent>,
    }

    impl IngestBusPublisher {
        pub fn new(sender: mpsc::UnboundedSender<BlockchainEvent>) -> Self {
            Self { sender }
        }
    }

    impl IngestEventPublisher for IngestBusPublisher {
        fn publish_tx_received(&self, tx_hash: Hash, raw_tx_hash: Hash) -> Result<(), PublishError> {
            let _ = tx_hash;
            // qc-raw-ingestor's port only carries the hashes; the full
            // `Transaction` isn't available here. Emission of the richer
            // `TxReceived` bus event happens at the mempool admission call
            // site in `MempoolAdapter::submit`, which has the value.
            let _ = raw_tx_hash;
            Ok(())
        }
    }
}

pub mod block_builder_publisher {
    use super::*;
    use qc_block_builder::{BlockEventPublisher, PublishError};
    use shared_types::ipc::BlockCreatedPayload;
    use shared_types::{Block, Hash};

    pub struct BlockBuilderBusPublisher {
        sender: mpsc::UnboundedSender<BlockchainEvent>,
        latest_block: std::sync::Mutex<Option<Block>>,
    }

    impl BlockBuilderBusPublisher {
        pub fn new(sender: mpsc::UnboundedSender<BlockchainEvent>) -> Self {
            Self {
                sender,
                latest_block: std::sync::Mutex::new(None),
            }
        }

        /// The block builder hands the service only `(hash, index)`; the
        /// full block is stashed here by the caller right before `append`
        /// so the bus event can carry it.
        pub fn stage(&self, block: Block) {
            *self.latest_block.lock().unwrap_or_else(|e| e.into_inner()) = Some(block);
        }
    }

    impl BlockEventPublisher for BlockBuilderBusPublisher {
        fn publish_block_created(&self, block_hash: Hash, index: u64) -> Result<(), PublishError> {
            let staged = self
                .latest_block
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .take();
            let Some(block) = staged else {
                return Ok(());
            };
            if block.hash != block_hash || block.index != index {
                return Ok(());
            }
            send_or_not_connected(&self.sender, BlockchainEvent::BlockCreated(BlockCreatedPayload { block }), || {
                PublishError::NotConnected
            })
        }
    }

    // `ChainStoreAdapter::append` stages the block the instant before
    // `BlockBuilderService::pack` calls `publish_block_created`; both it
    // and the service need a handle to the same publisher.
    impl BlockEventPublisher for std::sync::Arc<BlockBuilderBusPublisher> {
        fn publish_block_created(&self, block_hash: Hash, index: u64) -> Result<(), PublishError> {
            (**self).publish_block_created(block_hash, index)
        }
    }
}

pub mod consensus_publisher {
    use super::*;
    use qc_consensus::{ConsensusEventPublisher, PublishError};
    use shared_types::Address;

    /// Validator status changes are operator-facing bookkeeping with no
    /// dedicated `BlockchainEvent` variant; logged instead of dropped
    /// silently so an operator can still observe them.
    pub struct ConsensusBusPublisher;

    impl ConsensusEventPublisher for ConsensusBusPublisher {
        fn publish_validator_status_changed(&self, address: Address, status: &str) -> Result<(), PublishError> {
            tracing::info!(validator = %hex::encode(address), %status, "validator status changed");
            Ok(())
        }
    }
}

pub mod resilience_publisher {
    use super::*;
    use qc_resilience::adapters::publisher::{PublishError, ResilienceEventPublisher};
    use shared_types::ipc::{CircuitTransitionPayload, SyncManualTriggerPayload};

    pub struct ResilienceBusPublisher {
        sender: mpsc::UnboundedSender<BlockchainEvent>,
    }

    impl ResilienceBusPublisher {
        pub fn new(sender: mpsc::UnboundedSender<BlockchainEvent>) -> Self {
            Self { sender }
        }
    }

    impl ResilienceEventPublisher for ResilienceBusPublisher {
        fn publish_circuit_transition(
            &self,
            payload: CircuitTransitionPayload,
        ) -> Result<(), PublishError> {
            send_or_not_connected(&self.sender, BlockchainEvent::CircuitTransition(payload), || {
                PublishError::NotConnected
            })
        }

        fn publish_sync_manual_trigger(&self, trigger: SyncManualTriggerPayload) -> Result<(), PublishError> {
            send_or_not_connected(&self.sender, BlockchainEvent::SyncManualTrigger(trigger), || {
                PublishError::NotConnected
            })
        }
    }
}

pub mod peer_registry_publisher {
    use super::*;
    use qc_peer_registry::adapters::publisher::{PeerRegistryEventPublisher, PublishError};
    use shared_types::ipc::NodeRegisteredPayload;
    use shared_types::Peer;

    pub struct PeerRegistryBusPublisher {
        sender: mpsc::UnboundedSender<BlockchainEvent>,
    }

    impl PeerRegistryBusPublisher {
        pub fn new(sender: mpsc::UnboundedSender<BlockchainEvent>) -> Self {
            Self { sender }
        }
    }

    impl PeerRegistryEventPublisher for PeerRegistryBusPublisher {
        fn publish_node_registered(&self, peer: &Peer) -> Result<(), PublishError> {
            send_or_not_connected(
                &self.sender,
                BlockchainEvent::NodeRegistered(NodeRegisteredPayload { peer: peer.clone() }),
                || PublishError::NotConnected,
            )
        }
    }
}

pub mod chain_store_publisher {
    use super::*;
    use qc_chain_store::adapters::publisher::{PublishError, StorageEventPublisher};
    use shared_types::ipc::StorageCriticalPayload;

    pub struct ChainStoreBusPublisher {
        sender: mpsc::UnboundedSender<BlockchainEvent>,
    }

    impl ChainStoreBusPublisher {
        pub fn new(sender: mpsc::UnboundedSender<BlockchainEvent>) -> Self {
            Self { sender }
        }
    }

    impl StorageEventPublisher for ChainStoreBusPublisher {
        fn publish_storage_critical(&self, payload: StorageCriticalPayload) -> Result<(), PublishError> {
            send_or_not_connected(&self.sender, BlockchainEvent::StorageCritical(payload), || {
                PublishError::NotConnected
            })
        }
    }
}
