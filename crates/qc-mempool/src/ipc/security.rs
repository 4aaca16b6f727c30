//! Security boundaries and authorization for IPC messages.
//!
//! HMAC validation, nonce caching, and timestamp validation live in the
//! centralized `shared_types::security` module. This file only contains
//! authorization rules (which subsystem may send which message type) and
//! the subsystem id constants used to express them.

use crate::domain::MempoolError;

/// Subsystem ids for the node.
pub mod subsystem_id {
    /// Peer registry / gossip.
    pub const PEER_REGISTRY: u8 = 1;
    /// Chain store.
    pub const BLOCK_STORAGE: u8 = 2;
    /// Mempool (this subsystem).
    pub const MEMPOOL: u8 = 6;
    /// Consensus / block builder.
    pub const CONSENSUS: u8 = 8;
    /// Raw transaction ingestor.
    pub const RAW_INGESTOR: u8 = 10;
}

/// Authorization rules for IPC messages.
#[derive(Debug, Clone)]
pub struct AuthorizationRules;

impl AuthorizationRules {
    /// Only the raw ingestor may submit new transactions.
    pub fn validate_add_transaction(sender_id: u8) -> Result<(), MempoolError> {
        if sender_id != subsystem_id::RAW_INGESTOR {
            return Err(MempoolError::UnauthorizedSender {
                sender_id,
                allowed: vec![subsystem_id::RAW_INGESTOR],
            });
        }
        Ok(())
    }

    /// Only consensus (via the block builder) may request a batch.
    pub fn validate_get_batch(sender_id: u8) -> Result<(), MempoolError> {
        if sender_id != subsystem_id::CONSENSUS {
            return Err(MempoolError::UnauthorizedSender {
                sender_id,
                allowed: vec![subsystem_id::CONSENSUS],
            });
        }
        Ok(())
    }

    /// Only consensus may force-remove transactions outside the commit flow.
    pub fn validate_remove_transactions(sender_id: u8) -> Result<(), MempoolError> {
        if sender_id != subsystem_id::CONSENSUS {
            return Err(MempoolError::UnauthorizedSender {
                sender_id,
                allowed: vec![subsystem_id::CONSENSUS],
            });
        }
        Ok(())
    }

    /// Only the chain store may confirm that a block was persisted.
    pub fn validate_storage_confirmation(sender_id: u8) -> Result<(), MempoolError> {
        if sender_id != subsystem_id::BLOCK_STORAGE {
            return Err(MempoolError::UnauthorizedSender {
                sender_id,
                allowed: vec![subsystem_id::BLOCK_STORAGE],
            });
        }
        Ok(())
    }

    /// The chain store or consensus may reject a proposed block.
    pub fn validate_block_rejected(sender_id: u8) -> Result<(), MempoolError> {
        if sender_id != subsystem_id::BLOCK_STORAGE && sender_id != subsystem_id::CONSENSUS {
            return Err(MempoolError::UnauthorizedSender {
                sender_id,
                allowed: vec![subsystem_id::BLOCK_STORAGE, subsystem_id::CONSENSUS],
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_transaction_authorized_only_for_raw_ingestor() {
        assert!(AuthorizationRules::validate_add_transaction(subsystem_id::RAW_INGESTOR).is_ok());
        assert!(AuthorizationRules::validate_add_transaction(subsystem_id::CONSENSUS).is_err());
        assert!(AuthorizationRules::validate_add_transaction(subsystem_id::BLOCK_STORAGE).is_err());
        assert!(AuthorizationRules::validate_add_transaction(subsystem_id::MEMPOOL).is_err());
    }

    #[test]
    fn get_batch_authorized_only_for_consensus() {
        assert!(AuthorizationRules::validate_get_batch(subsystem_id::CONSENSUS).is_ok());
        assert!(AuthorizationRules::validate_get_batch(subsystem_id::RAW_INGESTOR).is_err());
        assert!(AuthorizationRules::validate_get_batch(subsystem_id::BLOCK_STORAGE).is_err());
    }

    #[test]
    fn storage_confirmation_authorized_only_for_block_storage() {
        assert!(
            AuthorizationRules::validate_storage_confirmation(subsystem_id::BLOCK_STORAGE).is_ok()
        );
        assert!(
            AuthorizationRules::validate_storage_confirmation(subsystem_id::CONSENSUS).is_err()
        );
        assert!(AuthorizationRules::validate_storage_confirmation(
            subsystem_id::RAW_INGESTOR
        )
        .is_err());
    }

    #[test]
    fn block_rejected_authorized_for_storage_and_consensus() {
        assert!(AuthorizationRules::validate_block_rejected(subsystem_id::BLOCK_STORAGE).is_ok());
        assert!(AuthorizationRules::validate_block_rejected(subsystem_id::CONSENSUS).is_ok());
        assert!(
            AuthorizationRules::validate_block_rejected(subsystem_id::RAW_INGESTOR).is_err()
        );
        assert!(AuthorizationRules::validate_block_rejected(subsystem_id::MEMPOOL).is_err());
    }
}
