//! # IPC Message Payloads
//!
//! Defines all choreographed event payloads exchanged over `shared-bus`
//! between the node's subsystems.
//!
//! ## Design Rules
//!
//! - All payloads are wrapped in `AuthenticatedMessage<T>` for intra-process
//!   dispatch, or signed with `X-Broadcast-Signature` when forwarded
//!   peer-to-peer by `qc-event-sync`.
//! - Payloads MUST NOT contain `requester_id` fields (envelope authority).
//! - Request/response pairs use the envelope's `correlation_id`.

use crate::entities::*;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

// =============================================================================
// RAW INGESTOR -> MEMPOOL
// =============================================================================

/// Emitted once a raw externally-signed transaction has been decoded,
/// recovered and accepted into the mempool.
/// Sender: `qc-raw-ingestor` | Receivers: `qc-event-sync`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReceivedPayload {
    /// The accepted transaction.
    pub tx: Transaction,
    /// Hash of the original raw (pre-decode) transaction bytes.
    pub raw_tx_hash: Hash,
}

// =============================================================================
// BLOCK BUILDER <-> CHAIN STORE / CONSENSUS
// =============================================================================

/// Emitted by `qc-block-builder` once a block has been signed and committed
/// to `qc-chain-store`.
/// Sender: `qc-block-builder` | Receivers: `qc-event-sync`, `qc-mempool`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockCreatedPayload {
    /// The committed block.
    pub block: Block,
}

/// Request to append a peer-received block, forwarded from `qc-event-sync`
/// to `qc-consensus` for verification before `qc-chain-store::append`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyBlockRequestPayload {
    /// The candidate block.
    pub block: Block,
}

/// Response to block verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyBlockResponsePayload {
    /// Whether the block is valid under the current validator snapshot.
    pub valid: bool,
    /// Reason for rejection, if any.
    pub reason: Option<String>,
}

// =============================================================================
// NODE / PEER REGISTRY
// =============================================================================

/// Emitted once a new peer completes registration.
/// Sender: `qc-peer-registry` | Receivers: `qc-event-sync`, `qc-resilience`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRegisteredPayload {
    /// The newly registered peer.
    pub peer: Peer,
}

/// Request for a list of peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerListRequestPayload {
    /// Maximum number of peers to return.
    pub max_peers: u32,
    /// Optional filter by minimum reputation.
    pub min_reputation: Option<u8>,
}

/// Response containing a peer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerListResponsePayload {
    /// The matching peers.
    pub peers: Vec<Peer>,
}

// =============================================================================
// EVENT SYNC / HEARTBEAT
// =============================================================================

/// Adaptive-interval liveness beacon.
/// Sender: `qc-resilience` | Receivers: `qc-event-sync` (for fan-out)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    /// The emitting node's id.
    pub node_id: String,
    /// The emitting node's current chain height.
    pub height: u64,
    /// The emitting node's current mempool size.
    pub mempool_size: u64,
    /// Seconds since the node started.
    pub uptime_secs: u64,
    /// Protocol version.
    pub version: u16,
    /// Free-form capability tags.
    pub capabilities: Vec<String>,
}

/// Request to synchronize a range of blocks from a peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequestPayload {
    /// First missing height (inclusive).
    pub from_height: u64,
    /// Last height to fetch (inclusive).
    pub to_height: u64,
}

/// Response carrying the requested block range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponsePayload {
    /// The returned blocks, ascending by height.
    pub blocks: Vec<Block>,
}

/// Emitted by `qc-resilience`'s health monitor when `maxPeerHeight -
/// localHeight > syncThreshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncManualTriggerPayload {
    /// Local height observed at trigger time.
    pub local_height: u64,
    /// Highest height reported by any active peer.
    pub target_height: u64,
    /// Node id of the peer selected for reconciliation.
    pub source_peer_id: String,
}

// =============================================================================
// CIRCUIT BREAKER / RESILIENCE (DLQ candidates)
// =============================================================================

/// Emitted on every circuit breaker phase transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitTransitionPayload {
    /// The circuit's peer id.
    pub peer_id: String,
    /// The circuit's guarded operation.
    pub operation: String,
    /// Phase transitioned from.
    pub from: CircuitPhase,
    /// Phase transitioned to.
    pub to: CircuitPhase,
}

/// Critical storage error event, published to the bus's dead-letter topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageCriticalPayload {
    /// The type of critical error.
    pub error_type: StorageCriticalError,
    /// The block hash involved, if applicable.
    pub block_hash: Option<Hash>,
    /// Human-readable description.
    pub description: String,
}

/// Types of critical storage errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StorageCriticalError {
    /// Data corruption detected (checksum mismatch).
    DataCorruption,
    /// Disk space below threshold.
    DiskFull,
    /// Database write failure.
    WriteFailed,
    /// Parent block not found (invariant violation).
    ParentNotFound,
}

// =============================================================================
// SIGNATURE VERIFICATION (shared request/response shape)
// =============================================================================

/// Request to verify an arbitrary signature via `qc-crypto`.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySignatureRequestPayload {
    /// The public key.
    #[serde_as(as = "Bytes")]
    pub public_key: PublicKey,
    /// The message that was signed.
    pub message: Vec<u8>,
    /// The signature to verify.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

/// Response to signature verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySignatureResponsePayload {
    /// Whether the signature is valid.
    pub valid: bool,
}
