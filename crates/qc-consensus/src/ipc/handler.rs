//! IPC handler translating wire payloads into `ConsensusApi` calls.
//!
//! Thin by design: block verification is the only request consensus serves
//! to other subsystems over IPC today (`qc-chain-store` and gossip
//! ingestion both need it); validator-set mutation is driven locally by the
//! orchestrator, not by network peers.

use crate::domain::{BlockSigningPayload, ConsensusError, SignatureMode};
use crate::ports::ConsensusApi;
use shared_types::{VerifyBlockRequestPayload, VerifyBlockResponsePayload};

/// Handles `VerifyBlockRequest` by recomputing the canonical signing
/// payload from the candidate block and dispatching to `ConsensusApi`.
pub fn handle_verify_block<C: ConsensusApi>(
    api: &mut C,
    request: &VerifyBlockRequestPayload,
) -> VerifyBlockResponsePayload {
    let block = &request.block;
    let payload = BlockSigningPayload {
        hash: block.hash,
        index: block.index,
        timestamp: block.timestamp,
        previous_hash: block.parent_hash,
        merkle_root: block.merkle_root,
        transactions_count: block.transactions_count,
        node_id: block.validator_address,
    };

    match api.verify_block(&payload, &block.signature, block.parent_hash) {
        Ok(()) => VerifyBlockResponsePayload {
            valid: true,
            reason: None,
        },
        Err(e) => VerifyBlockResponsePayload {
            valid: false,
            reason: Some(reason_for(&e)),
        },
    }
}

fn reason_for(err: &ConsensusError) -> String {
    err.to_string()
}

/// Dispatches a block-signing request for the local node, used by
/// `qc-block-builder` when it holds leadership for the target height.
pub fn handle_sign_block<C: ConsensusApi>(
    api: &mut C,
    payload: &BlockSigningPayload,
    previous_hash: shared_types::Hash,
    mode: SignatureMode,
    local_node: shared_types::Address,
) -> Result<String, ConsensusError> {
    api.sign_block(payload, previous_hash, mode, local_node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::publisher::RecordingPublisher;
    use crate::ports::outbound::{MockSigningKeySource, MockTimeSource};
    use crate::service::{ConsensusConfig, ConsensusService};
    use shared_types::Block;
    use std::collections::BTreeMap;

    #[test]
    fn verify_block_rejects_unregistered_signer() {
        let mut svc = ConsensusService::new(
            ConsensusConfig::default(),
            MockTimeSource(std::sync::atomic::AtomicU64::new(1_000)),
            MockSigningKeySource {
                ecdsa: None,
                hmac: None,
            },
            RecordingPublisher::new(),
        );

        let block = Block {
            index: 1,
            parent_hash: [0u8; 32],
            timestamp: 1_000,
            validator_address: [9u8; 20],
            signature: "ecdsa:00".to_string(),
            merkle_root: [0u8; 32],
            transactions_count: 0,
            transactions: vec![],
            metadata: BTreeMap::new(),
            hash: [1u8; 32],
        };
        let response = handle_verify_block(&mut svc, &VerifyBlockRequestPayload { block });
        assert!(!response.valid);
    }
}
