//! IPC message handler — Two-Phase Commit coordinator.
//!
//! ## Security validation order
//!
//! 1. Sender authorization (per message type)
//! 2. Timestamp bounds
//! 3. HMAC signature verification
//! 4. Nonce uniqueness (replay prevention)
//!
//! ## Two-Phase Commit flow
//!
//! ```text
//! Block builder → GetBatchRequest → [propose] → PendingInclusion
//! Chain store   → BlockStorageConfirmation → [remove] → deleted
//! Consensus     → BlockRejectedNotification → [rollback] → Pending
//! ```

use crate::domain::{Hash, MempoolError, TransactionPool};
use crate::ipc::payloads::*;
use crate::ipc::security::AuthorizationRules;
use crate::ports::TimeSource;
use shared_types::security::{validate_hmac_signature, DerivedKeyProvider, KeyProvider, NonceCache};
use std::sync::Arc;
use uuid::Uuid;

/// Security context for IPC message validation.
///
/// Groups the common security parameters required by every handler so that
/// call sites pass one struct instead of four loose arguments.
#[derive(Debug)]
pub struct IpcSecurityContext<'a> {
    /// Subsystem id of the message sender (from the envelope).
    pub sender_id: u8,
    /// Message timestamp, for freshness validation.
    pub timestamp: u64,
    /// Unique message nonce, for replay prevention.
    pub nonce: Uuid,
    /// HMAC signature over the message bytes.
    pub signature: &'a [u8; 64],
    /// Raw message bytes (the signature is computed over these).
    pub message_bytes: &'a [u8],
}

impl<'a> IpcSecurityContext<'a> {
    /// Creates a new security context from envelope fields.
    #[inline]
    pub fn new(
        sender_id: u8,
        timestamp: u64,
        nonce: Uuid,
        signature: &'a [u8; 64],
        message_bytes: &'a [u8],
    ) -> Self {
        Self {
            sender_id,
            timestamp,
            nonce,
            signature,
            message_bytes,
        }
    }
}

/// IPC message handler for the mempool.
///
/// Uses the centralized security module from `shared-types` for HMAC,
/// nonce, and timestamp validation.
pub struct IpcHandler<T: TimeSource> {
    pool: TransactionPool,
    time_source: T,
    nonce_cache: Arc<NonceCache>,
    key_provider: DerivedKeyProvider,
}

impl<T: TimeSource> IpcHandler<T> {
    /// Creates a new handler with a development-only default master secret.
    pub fn new(pool: TransactionPool, time_source: T) -> Self {
        Self::with_master_secret(pool, time_source, vec![0u8; 32])
    }

    /// Creates a new handler with a custom master secret, used to derive
    /// per-subsystem HMAC keys.
    pub fn with_master_secret(pool: TransactionPool, time_source: T, master_secret: Vec<u8>) -> Self {
        Self {
            pool,
            time_source,
            nonce_cache: NonceCache::new_shared(),
            key_provider: DerivedKeyProvider::new(master_secret),
        }
    }

    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut TransactionPool {
        &mut self.pool
    }

    /// Validates timestamp, HMAC signature, and nonce freshness.
    fn validate_security(&self, ctx: &IpcSecurityContext<'_>) -> Result<(), MempoolError> {
        let now = self.time_source.now();
        let max_age = shared_types::security::MAX_AGE;
        let max_future = shared_types::security::MAX_FUTURE_SKEW;

        if ctx.timestamp > now + max_future || (now > ctx.timestamp && now - ctx.timestamp > max_age)
        {
            tracing::warn!(timestamp = ctx.timestamp, now, "rejecting message outside validity window");
            return Err(MempoolError::TimestampOutOfRange {
                timestamp: ctx.timestamp,
                now,
            });
        }

        let shared_secret = self
            .key_provider
            .get_shared_secret(ctx.sender_id)
            .ok_or(MempoolError::InvalidSignature)?;

        if !validate_hmac_signature(ctx.message_bytes, ctx.signature, &shared_secret) {
            tracing::warn!(sender_id = ctx.sender_id, "HMAC signature validation failed");
            return Err(MempoolError::InvalidSignature);
        }

        if !self.nonce_cache.check_and_insert(ctx.nonce) {
            tracing::warn!(sender_id = ctx.sender_id, "replay attack detected");
            return Err(MempoolError::ReplayDetected);
        }

        Ok(())
    }

    /// Handles `AddTransactionRequest`. Authorized sender: raw ingestor only.
    pub fn handle_add_transaction(
        &mut self,
        ctx: &IpcSecurityContext<'_>,
        request: AddTransactionRequest,
    ) -> Result<AddTransactionResponse, MempoolError> {
        AuthorizationRules::validate_add_transaction(ctx.sender_id)?;
        self.validate_security(ctx)?;

        let tx_hash = request.transaction.hash;
        let now = self.time_source.now();
        match self.pool.add_transaction(request.transaction, now) {
            Ok(()) => Ok(AddTransactionResponse {
                correlation_id: request.correlation_id,
                accepted: true,
                tx_hash: Some(tx_hash),
                error: None,
            }),
            Err(e) => Ok(AddTransactionResponse {
                correlation_id: request.correlation_id,
                accepted: false,
                tx_hash: None,
                error: Some(e.to_string()),
            }),
        }
    }

    /// Handles `GetBatchRequest`. Authorized sender: block builder/consensus.
    pub fn handle_get_batch(
        &mut self,
        ctx: &IpcSecurityContext<'_>,
        request: GetBatchRequest,
    ) -> Result<GetBatchResponse, MempoolError> {
        AuthorizationRules::validate_get_batch(ctx.sender_id)?;
        self.validate_security(ctx)?;

        let txs = self.pool.get_batch(request.max_count as usize);
        let tx_hashes: Vec<Hash> = txs.iter().map(|t| t.hash()).collect();

        let now = self.time_source.now();
        self.pool
            .propose(&tx_hashes, request.target_block_height, now);

        Ok(GetBatchResponse {
            correlation_id: request.correlation_id,
            tx_hashes,
        })
    }

    /// Handles `BlockStorageConfirmation`. Authorized sender: chain store.
    pub fn handle_storage_confirmation(
        &mut self,
        ctx: &IpcSecurityContext<'_>,
        confirmation: BlockStorageConfirmation,
    ) -> Result<Vec<Hash>, MempoolError> {
        AuthorizationRules::validate_storage_confirmation(ctx.sender_id)?;
        self.validate_security(ctx)?;

        Ok(self.pool.remove(&confirmation.included_transactions))
    }

    /// Handles `BlockRejectedNotification`. Authorized senders: chain store, consensus.
    pub fn handle_block_rejected(
        &mut self,
        ctx: &IpcSecurityContext<'_>,
        notification: BlockRejectedNotification,
    ) -> Result<Vec<Hash>, MempoolError> {
        AuthorizationRules::validate_block_rejected(ctx.sender_id)?;
        self.validate_security(ctx)?;

        Ok(self.pool.rollback(&notification.affected_transactions))
    }

    /// Handles `RemoveTransactionsRequest`. Authorized sender: consensus.
    pub fn handle_remove_transactions(
        &mut self,
        ctx: &IpcSecurityContext<'_>,
        request: RemoveTransactionsRequest,
    ) -> Result<RemoveTransactionsResponse, MempoolError> {
        AuthorizationRules::validate_remove_transactions(ctx.sender_id)?;
        self.validate_security(ctx)?;

        let removed = self.pool.remove(&request.tx_hashes);
        Ok(RemoveTransactionsResponse {
            correlation_id: request.correlation_id,
            removed_count: removed.len(),
            removed,
        })
    }

    /// Handles `GetStatusRequest`. No authorization required; status is public.
    pub fn handle_get_status(&self, request: GetStatusRequest) -> GetStatusResponse {
        let now = self.time_source.now();
        GetStatusResponse {
            correlation_id: request.correlation_id,
            status: self.pool.stats(now).into(),
        }
    }

    /// Runs periodic cleanup of timed-out `PendingInclusion` entries.
    pub fn cleanup_timeouts(&mut self) -> Vec<Hash> {
        let now = self.time_source.now();
        self.pool.cleanup_timeouts(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MempoolConfig;
    use crate::ipc::security::subsystem_id;
    use crate::ports::outbound::MockTimeSource;
    use shared_types::Transaction;

    fn create_test_signature(message: &[u8], sender_id: u8, master_secret: &[u8]) -> [u8; 64] {
        let key_provider = DerivedKeyProvider::new(master_secret.to_vec());
        let shared_secret = key_provider.get_shared_secret(sender_id).unwrap();
        shared_types::security::sign_message(message, &shared_secret)
    }

    fn create_handler_with_secret(secret: Vec<u8>) -> IpcHandler<MockTimeSource> {
        let pool = TransactionPool::new(MempoolConfig::for_testing());
        let time_source = MockTimeSource::new(1000);
        IpcHandler::with_master_secret(pool, time_source, secret)
    }

    fn test_tx(nonce: u64, hash_byte: u8) -> Transaction {
        Transaction {
            from: [0xBB; 20],
            to: Some([0xCC; 20]),
            amount: 1_000_000,
            fee: 21_000,
            nonce,
            gas_limit: Some(21_000),
            gas_price: None,
            data: vec![],
            signature: [0u8; 65],
            hash: [hash_byte; 32],
        }
    }

    fn create_add_request(tx: Transaction) -> AddTransactionRequest {
        AddTransactionRequest {
            correlation_id: Uuid::new_v4(),
            transaction: tx,
        }
    }

    fn ctx<'a>(
        sender_id: u8,
        timestamp: u64,
        nonce: Uuid,
        signature: &'a [u8; 64],
        message_bytes: &'a [u8],
    ) -> IpcSecurityContext<'a> {
        IpcSecurityContext::new(sender_id, timestamp, nonce, signature, message_bytes)
    }

    #[test]
    fn add_transaction_authorized_accepts() {
        let secret = vec![0u8; 32];
        let mut handler = create_handler_with_secret(secret.clone());
        let request = create_add_request(test_tx(0, 0xAB));
        let message_bytes = b"m";
        let sig = create_test_signature(message_bytes, subsystem_id::RAW_INGESTOR, &secret);
        let c = ctx(
            subsystem_id::RAW_INGESTOR,
            1000,
            Uuid::new_v4(),
            &sig,
            message_bytes,
        );

        let response = handler.handle_add_transaction(&c, request).unwrap();
        assert!(response.accepted);
        assert!(response.tx_hash.is_some());
    }

    #[test]
    fn add_transaction_unauthorized_sender_rejected() {
        let secret = vec![0u8; 32];
        let mut handler = create_handler_with_secret(secret.clone());
        let request = create_add_request(test_tx(0, 0xAB));
        let message_bytes = b"m";
        let sig = create_test_signature(message_bytes, subsystem_id::CONSENSUS, &secret);
        let c = ctx(
            subsystem_id::CONSENSUS,
            1000,
            Uuid::new_v4(),
            &sig,
            message_bytes,
        );

        let result = handler.handle_add_transaction(&c, request);
        assert!(matches!(result, Err(MempoolError::UnauthorizedSender { .. })));
    }

    #[test]
    fn add_transaction_invalid_hmac_rejected() {
        let secret = vec![0u8; 32];
        let mut handler = create_handler_with_secret(secret);
        let request = create_add_request(test_tx(0, 0xAB));
        let message_bytes = b"m";
        let bad_sig = [0xFFu8; 64];
        let c = ctx(
            subsystem_id::RAW_INGESTOR,
            1000,
            Uuid::new_v4(),
            &bad_sig,
            message_bytes,
        );

        let result = handler.handle_add_transaction(&c, request);
        assert!(matches!(result, Err(MempoolError::InvalidSignature)));
    }

    #[test]
    fn replay_attack_rejected_on_second_use() {
        let secret = vec![0u8; 32];
        let mut handler = create_handler_with_secret(secret.clone());
        let nonce = Uuid::new_v4();
        let message_bytes = b"m";
        let sig = create_test_signature(message_bytes, subsystem_id::RAW_INGESTOR, &secret);

        let r1 = create_add_request(test_tx(0, 0xAB));
        let c1 = ctx(subsystem_id::RAW_INGESTOR, 1000, nonce, &sig, message_bytes);
        assert!(handler.handle_add_transaction(&c1, r1).is_ok());

        let r2 = create_add_request(test_tx(1, 0xCD));
        let c2 = ctx(subsystem_id::RAW_INGESTOR, 1000, nonce, &sig, message_bytes);
        let result2 = handler.handle_add_transaction(&c2, r2);
        assert!(matches!(result2, Err(MempoolError::ReplayDetected)));
    }

    #[test]
    fn timestamp_too_old_rejected() {
        let secret = vec![0u8; 32];
        let mut handler = create_handler_with_secret(secret.clone());
        let request = create_add_request(test_tx(0, 0xAB));
        let message_bytes = b"m";
        let sig = create_test_signature(message_bytes, subsystem_id::RAW_INGESTOR, &secret);
        let c = ctx(
            subsystem_id::RAW_INGESTOR,
            1000 - 100,
            Uuid::new_v4(),
            &sig,
            message_bytes,
        );

        let result = handler.handle_add_transaction(&c, request);
        assert!(matches!(result, Err(MempoolError::TimestampOutOfRange { .. })));
    }

    #[test]
    fn full_two_phase_commit_flow() {
        let secret = vec![0u8; 32];
        let mut handler = create_handler_with_secret(secret.clone());
        let message_bytes = b"m";

        let add_req = create_add_request(test_tx(0, 0xAB));
        let add_sig = create_test_signature(message_bytes, subsystem_id::RAW_INGESTOR, &secret);
        let add_ctx = ctx(
            subsystem_id::RAW_INGESTOR,
            1000,
            Uuid::new_v4(),
            &add_sig,
            message_bytes,
        );
        let add_response = handler.handle_add_transaction(&add_ctx, add_req).unwrap();
        let tx_hash = add_response.tx_hash.unwrap();

        assert!(handler
            .pool()
            .get(&tx_hash)
            .unwrap()
            .is_pending());

        let get_req = GetBatchRequest {
            correlation_id: Uuid::new_v4(),
            max_count: 100,
            target_block_height: 1,
        };
        let get_sig = create_test_signature(message_bytes, subsystem_id::CONSENSUS, &secret);
        let get_ctx = ctx(
            subsystem_id::CONSENSUS,
            1000,
            Uuid::new_v4(),
            &get_sig,
            message_bytes,
        );
        let response = handler.handle_get_batch(&get_ctx, get_req).unwrap();
        assert_eq!(response.tx_hashes, vec![tx_hash]);
        assert!(handler
            .pool()
            .get(&tx_hash)
            .unwrap()
            .is_pending_inclusion());

        let confirmation = BlockStorageConfirmation {
            correlation_id: Uuid::new_v4(),
            block_hash: [0xCC; 32],
            block_height: 1,
            included_transactions: vec![tx_hash],
            storage_timestamp: 2000,
        };
        let confirm_sig = create_test_signature(message_bytes, subsystem_id::BLOCK_STORAGE, &secret);
        let confirm_ctx = ctx(
            subsystem_id::BLOCK_STORAGE,
            1000,
            Uuid::new_v4(),
            &confirm_sig,
            message_bytes,
        );
        handler
            .handle_storage_confirmation(&confirm_ctx, confirmation)
            .unwrap();

        assert!(!handler.pool().contains(&tx_hash));
    }

    #[test]
    fn two_phase_commit_rollback_flow() {
        let secret = vec![0u8; 32];
        let mut handler = create_handler_with_secret(secret.clone());
        let message_bytes = b"m";

        let add_req = create_add_request(test_tx(0, 0xAB));
        let add_sig = create_test_signature(message_bytes, subsystem_id::RAW_INGESTOR, &secret);
        let add_ctx = ctx(
            subsystem_id::RAW_INGESTOR,
            1000,
            Uuid::new_v4(),
            &add_sig,
            message_bytes,
        );
        let add_response = handler.handle_add_transaction(&add_ctx, add_req).unwrap();
        let tx_hash = add_response.tx_hash.unwrap();

        let get_req = GetBatchRequest {
            correlation_id: Uuid::new_v4(),
            max_count: 100,
            target_block_height: 1,
        };
        let get_sig = create_test_signature(message_bytes, subsystem_id::CONSENSUS, &secret);
        let get_ctx = ctx(
            subsystem_id::CONSENSUS,
            1000,
            Uuid::new_v4(),
            &get_sig,
            message_bytes,
        );
        handler.handle_get_batch(&get_ctx, get_req).unwrap();
        assert!(handler
            .pool()
            .get(&tx_hash)
            .unwrap()
            .is_pending_inclusion());

        let notification = BlockRejectedNotification {
            correlation_id: Uuid::new_v4(),
            block_hash: [0xCC; 32],
            block_height: 1,
            affected_transactions: vec![tx_hash],
            rejection_reason: BlockRejectionReason::ConsensusRejected,
        };
        let reject_sig = create_test_signature(message_bytes, subsystem_id::CONSENSUS, &secret);
        let reject_ctx = ctx(
            subsystem_id::CONSENSUS,
            1000,
            Uuid::new_v4(),
            &reject_sig,
            message_bytes,
        );
        handler
            .handle_block_rejected(&reject_ctx, notification)
            .unwrap();

        assert!(handler.pool().get(&tx_hash).unwrap().is_pending());
    }
}
