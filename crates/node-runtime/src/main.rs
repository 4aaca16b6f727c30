//! # Node Runtime
//!
//! Entry point for a Quantum-Chain node: assembles the mempool, block
//! builder, consensus, chain store, peer registry, resilience and event
//! sync subsystems behind the shared event bus, seeds genesis, and runs
//! the block-production and event-dispatch loops.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use node_runtime::container::{NodeConfig, SubsystemContainer};
use node_runtime::genesis::GenesisConfig;

fn load_node_keypair() -> qc_crypto::KeyPair {
    match std::env::var("QC_NODE_KEY") {
        Ok(hex_secret) => {
            let bytes = hex::decode(hex_secret.trim()).expect("QC_NODE_KEY must be 64 hex characters");
            let secret: [u8; 32] = bytes.try_into().expect("QC_NODE_KEY must decode to 32 bytes");
            qc_crypto::KeyPair::from_bytes(secret).expect("QC_NODE_KEY is not a valid secp256k1 secret")
        }
        Err(_) => {
            warn!("QC_NODE_KEY not set; generating an ephemeral validator key for this run");
            qc_crypto::KeyPair::generate()
        }
    }
}

fn load_config(node_keypair: &qc_crypto::KeyPair) -> NodeConfig {
    let mut config = NodeConfig::default();

    if let Ok(secret_hex) = std::env::var("QC_HMAC_SECRET") {
        let bytes = hex::decode(secret_hex.trim()).expect("QC_HMAC_SECRET must be 64 hex characters");
        config.security.hmac_secret = bytes.try_into().expect("QC_HMAC_SECRET must decode to 32 bytes");
    }
    if let Ok(data_dir) = std::env::var("QC_DATA_DIR") {
        config.storage.data_dir = data_dir.into();
    }
    if let Ok(node_id) = std::env::var("QC_NODE_ID") {
        config.identity.node_id = node_id;
    }

    // Devnet convenience: this node is its own sole genesis validator
    // unless the operator supplied an explicit validator set.
    if config.genesis.initial_validators.is_empty() {
        config.genesis = GenesisConfig::devnet(node_keypair.public_key(), config.consensus.registry.minimum_stake);
    }

    if std::env::var("QC_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    config
}

/// Attempts to pack and append one block, logging the (expected-in-steady-state)
/// failures at `debug` rather than `warn`.
fn try_produce_block(container: &SubsystemContainer) {
    use qc_block_builder::BlockBuilderApi;

    let mut builder = container.block_builder.write().unwrap_or_else(|e| e.into_inner());
    match builder.pack(500, container.local_node_id) {
        Ok(block) => {
            container.mempool_adapter.record_confirmed(&block);
            info!(height = block.index, txs = block.transactions_count, "produced block");
        }
        Err(qc_block_builder::BuildError::NotLeader) | Err(qc_block_builder::BuildError::EmptyMempool) => {}
        Err(e) => warn!(error = %e, "block production failed"),
    }
}

/// Drains locally-queued events and re-broadcasts them to eligible peers.
fn dispatch_pending_events(container: &SubsystemContainer) {
    use qc_event_sync::{BroadcastTransport, EventSyncApi};

    let mut sync = container.event_sync.write().unwrap_or_else(|e| e.into_inner());
    while let Some(event) = sync.pop_for_dispatch() {
        debug!(event_id = %event.id, event_type = ?event.event_type, "dispatched local event");
        let body = event.payload.clone();
        for target in sync.broadcast_plan(&event, &body) {
            let ok = container
                .broadcast_transport
                .send(&target.peer_id, &event, &target.signature_hex)
                .is_ok();
            sync.record_broadcast_result(&target.peer_id, ok);
        }
    }
}

async fn run_node(container: SubsystemContainer) -> Result<()> {
    info!(node_id = %hex::encode(container.local_node_id), "node runtime started");

    let mut production_tick = tokio::time::interval(Duration::from_secs(2));
    let mut dispatch_tick = tokio::time::interval(Duration::from_millis(500));

    loop {
        tokio::select! {
            _ = production_tick.tick() => try_produce_block(&container),
            _ = dispatch_tick.tick() => dispatch_pending_events(&container),
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install tracing subscriber")?;

    let node_keypair = load_node_keypair();
    let config = load_config(&node_keypair);

    info!(node_id = %config.identity.node_id, rpc_port = config.identity.rpc_port, "starting node");

    let container = SubsystemContainer::build(config, node_keypair).context("failed to assemble node subsystems")?;

    run_node(container).await
}
