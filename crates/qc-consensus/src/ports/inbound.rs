//! # Inbound Port — ConsensusApi
//!
//! Primary driving port exposing validator-set management and
//! leader-selection/signing to the rest of the node: `qc-block-builder`
//! (leader check + signing), `qc-chain-store`/peers (signature
//! verification), and operator tooling (stake management).

use crate::domain::{BlockSigningPayload, ConsensusError, SignatureMode};
use shared_types::{Address, PublicKey, Validator};

/// Primary API for the consensus subsystem.
pub trait ConsensusApi: Send + Sync {
    /// Registers a new validator.
    fn add_validator(
        &mut self,
        address: Address,
        public_key: PublicKey,
        stake: u64,
        commission_rate_bps: u32,
    ) -> Result<(), ConsensusError>;

    /// Removes a validator (voluntary exit).
    fn remove_validator(&mut self, address: &Address) -> Result<(), ConsensusError>;

    /// `increaseStake`.
    fn increase_stake(&mut self, address: &Address, amount: u64) -> Result<u64, ConsensusError>;

    /// `decreaseStake`; fails `BelowMinimum` if the validator would stay
    /// `Active` below the floor.
    fn decrease_stake(&mut self, address: &Address, amount: u64) -> Result<u64, ConsensusError>;

    /// `penalize(address, amount, reason)`.
    fn penalize(&mut self, address: &Address, amount: u64, reason: &str) -> Result<(), ConsensusError>;

    /// `reward(address, amount)`.
    fn reward(&mut self, address: &Address, amount: u64) -> Result<(), ConsensusError>;

    /// `getActive()`.
    fn active_validators(&mut self) -> Vec<Validator>;

    /// Selects the leader for the block following `previous_hash` at
    /// `height`.
    fn select_leader(&mut self, previous_hash: shared_types::Hash, height: u64) -> Result<Address, ConsensusError>;

    /// Signs a block payload as `local_node`, failing `NotLeader` if it was
    /// not selected.
    fn sign_block(
        &mut self,
        payload: &BlockSigningPayload,
        previous_hash: shared_types::Hash,
        mode: SignatureMode,
        local_node: Address,
    ) -> Result<String, ConsensusError>;

    /// Verifies a signed block payload against the leader-selection rule.
    fn verify_block(
        &mut self,
        payload: &BlockSigningPayload,
        signature: &str,
        previous_hash: shared_types::Hash,
    ) -> Result<(), ConsensusError>;

    /// Current per-block reward at `height`.
    fn current_reward(&self, height: u64) -> u64;

    /// Advances epoch bookkeeping after a block at `height` is appended.
    fn advance_epoch(&mut self, height: u64);
}
