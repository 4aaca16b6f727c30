//! # Core Domain Entities
//!
//! Canonical definitions of the chain's data model. Every subsystem crate in
//! this workspace depends on these types rather than defining its own copies
//! so that hashing, serialization and storage agree on one shape.
//!
//! ## Clusters
//!
//! - **Chain**: `Transaction`, `Block`, hashes and addresses.
//! - **Mempool**: `MempoolEntry`, `MempoolStatus`.
//! - **Consensus**: `Validator`, `ValidatorStatus`.
//! - **Networking**: `Peer`, `PeerStatus`.
//! - **Resilience**: `CircuitState`, `CircuitPhase`, `BroadcastTrack`.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::collections::BTreeMap;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte hash (SHA-256, keccak256 or the Merkle combinator).
pub type Hash = [u8; 32];

/// A 20-byte account/validator/node address.
pub type Address = [u8; 20];

/// A 65-byte recoverable ECDSA signature (r, s, v).
pub type Signature = [u8; 65];

/// A 33-byte compressed secp256k1 public key.
pub type PublicKey = [u8; 33];

/// All-zero sentinel used as the genesis parent hash and the empty Merkle root.
pub const ZERO_HASH: Hash = [0u8; 32];

/// A signed transaction as it is accepted into the mempool and, eventually,
/// a block.
///
/// `hash` is a pure function of the other fields (see `TxRecord::hash` in
/// `qc-block-builder`); two transactions with the same `from`/`nonce` MUST
/// NOT both reach a confirmed hash.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender address.
    pub from: Address,
    /// Recipient address; `None` for contract-creation-shaped payloads.
    pub to: Option<Address>,
    /// Amount, fixed-point with 8 decimals (base units).
    pub amount: u64,
    /// Fee, fixed-point with 8 decimals (base units).
    pub fee: u64,
    /// Strictly increasing per sender.
    pub nonce: u64,
    /// Optional execution gas limit.
    pub gas_limit: Option<u64>,
    /// Optional execution gas price.
    pub gas_price: Option<u64>,
    /// Optional opaque execution payload.
    pub data: Vec<u8>,
    /// Signature produced externally over `canonical_preimage()`.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
    /// Content-address of the canonical serialization.
    pub hash: Hash,
}

/// A block header plus its ordered transactions.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Height, starting at 0 for genesis.
    pub index: u64,
    /// Hash of the block at `index - 1`; `ZERO_HASH` for genesis.
    pub parent_hash: Hash,
    /// Unix timestamp (seconds) the block was proposed.
    pub timestamp: u64,
    /// The validator who produced this block.
    pub validator_address: Address,
    /// Signature over the canonical signing payload, tagged `ecdsa:` or
    /// `hmac_sha256:`.
    pub signature: String,
    /// Merkle root over `transactions`, per the pairing rule in `qc-block-builder`.
    pub merkle_root: Hash,
    /// `transactions.len()`, carried redundantly for quick integrity checks.
    pub transactions_count: u32,
    /// Ordered transactions included in this block.
    pub transactions: Vec<Transaction>,
    /// Free-form metadata (never consulted for consensus).
    pub metadata: BTreeMap<String, String>,
    /// Digest over (index, parent_hash, timestamp, merkle_root, validator, transactions_count).
    pub hash: Hash,
}

// =============================================================================
// CLUSTER B: MEMPOOL
// =============================================================================

/// Lifecycle status of a mempool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MempoolStatus {
    /// Waiting to be picked by a block builder.
    Pending,
    /// Proposed for inclusion in a not-yet-committed block.
    Processing,
    /// Rejected during a (re)validation pass; eligible for removal.
    Failed,
}

/// A transaction sitting in the mempool together with its derived priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MempoolEntry {
    /// The underlying transaction.
    pub tx: Transaction,
    /// `fee / gas_limit` (or `fee` alone when `gas_limit` is absent).
    pub priority_score: u64,
    /// Number of times this entry has been broadcast to peers.
    pub broadcast_count: u32,
    /// Current lifecycle status.
    pub status: MempoolStatus,
    /// Unix timestamp the entry was accepted.
    pub created_at: u64,
    /// Unix timestamp after which the entry is eligible for TTL eviction.
    pub expires_at: u64,
}

// =============================================================================
// CLUSTER C: CONSENSUS
// =============================================================================

/// Validator lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorStatus {
    /// Eligible for leader selection.
    Active,
    /// Below minimum stake, or voluntarily withdrawn.
    Inactive,
    /// Penalized for provable misbehavior; excluded until released.
    Jailed,
    /// Stake is being withdrawn; no longer eligible but not yet fully exited.
    Unbonding,
}

/// A validator's stake-weighted registration in the active set.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validator {
    /// Identity / payout address.
    pub address: Address,
    /// secp256k1 public key used to verify `ecdsa:`-tagged block signatures.
    #[serde_as(as = "Bytes")]
    pub public_key: PublicKey,
    /// Staked amount backing this validator's voting weight.
    pub stake: u64,
    /// Lifecycle status.
    pub status: ValidatorStatus,
    /// Fraction of rewards retained by the validator, in basis points.
    pub commission_rate_bps: u32,
    /// Count of blocks successfully produced.
    pub blocks_produced: u64,
    /// Count of blocks missed while selected as leader.
    pub blocks_missed: u64,
    /// Count of penalties applied.
    pub penalties_count: u32,
    /// Height of the last block this validator produced or was penalized at.
    pub last_activity_block: u64,
    /// Unix timestamp of registration; used as the leader-selection tie-break.
    pub registered_at: u64,
    /// Unix timestamp before which this validator is ineligible for selection
    /// following a penalty; `0` when no cooldown is active.
    pub cooldown_until: u64,
    /// Accrued rewards, tracked separately from `stake`.
    pub rewards_ledger: u64,
}

// =============================================================================
// CLUSTER D: NETWORKING
// =============================================================================

/// Peer lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerStatus {
    /// Eligible for fan-out and sync.
    Active,
    /// Known but not currently participating (e.g. missed heartbeats).
    Inactive,
    /// Excluded from all traffic following repeated integrity violations.
    Banned,
}

/// A known peer node.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peer {
    /// Unique node identifier.
    pub node_id: String,
    /// Network host.
    pub host: String,
    /// Network port.
    pub port: u16,
    /// Public key used to verify peer-originated signatures.
    #[serde_as(as = "Bytes")]
    pub public_key: PublicKey,
    /// Protocol version the peer reports.
    pub version: u16,
    /// Lifecycle status.
    pub status: PeerStatus,
    /// Reputation score in `[0, 100]`.
    pub reputation_score: u8,
    /// Unix timestamp of last contact (heartbeat or sync).
    pub last_seen: u64,
    /// Free-form metadata (capabilities, node_type, …).
    pub metadata: BTreeMap<String, String>,
}

// =============================================================================
// CLUSTER E: RESILIENCE
// =============================================================================

/// Circuit breaker phase for a single (peer, operation) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitPhase {
    /// Requests are allowed; failures are being counted.
    Closed,
    /// Requests are rejected until `next_attempt_at`.
    Open,
    /// A single probe request is allowed to decide whether to close or reopen.
    HalfOpen,
}

/// Persisted state of one (peer, operation) circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitState {
    /// The peer this circuit guards.
    pub peer_id: String,
    /// The operation this circuit guards (e.g. `"broadcast"`).
    pub operation: String,
    /// Current phase.
    pub state: CircuitPhase,
    /// Consecutive failures since the last success.
    pub failure_count: u32,
    /// Consecutive successes since the circuit entered `HalfOpen`.
    pub success_count: u32,
    /// Unix timestamp of the last failure, if any.
    pub last_failure_at: Option<u64>,
    /// Unix timestamp of the last success, if any.
    pub last_success_at: Option<u64>,
    /// Unix timestamp this circuit last changed phase.
    pub state_changed_at: u64,
    /// Unix timestamp after which an `Open` circuit may probe again.
    pub next_attempt_at: u64,
    /// Total requests observed in the current sampling window.
    pub total_requests: u64,
    /// Failed requests observed in the current sampling window.
    pub failed_requests: u64,
}

/// One hop of an event's anti-loop broadcast trail.
///
/// Uniqueness key: `(tx_hash, source_node_id, current_node_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastTrack {
    /// Hash of the transaction or id of the event being tracked.
    pub tx_hash: String,
    /// The node that originated the broadcast.
    pub source_node_id: String,
    /// The node that is about to forward (or has forwarded) this broadcast.
    pub current_node_id: String,
    /// Number of hops taken so far.
    pub hop_count: u8,
    /// Nodes visited so far, in order.
    pub path: Vec<String>,
    /// Unix timestamp after which this track entry may be garbage-collected.
    pub expires_at: u64,
}

impl Block {
    /// True for the block at height 0.
    #[must_use]
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.parent_hash == ZERO_HASH
    }
}

impl Validator {
    /// True when `status == Active` and no cooldown is in effect at `now`.
    #[must_use]
    pub fn is_eligible(&self, now: u64, minimum_stake: u64) -> bool {
        self.status == ValidatorStatus::Active
            && self.stake >= minimum_stake
            && self.cooldown_until <= now
    }
}
