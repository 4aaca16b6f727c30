//! Core domain entities for the mempool.
//!
//! Defines the transaction state machine used for the Two-Phase Commit
//! dance between `getBatch`/block proposal and `remove`/confirmation.

pub use shared_types::{Address, Hash, MempoolEntry, MempoolStatus, Transaction};

/// Timestamp in seconds since UNIX epoch.
pub type Timestamp = u64;

/// Transaction state in the Two-Phase Commit protocol.
///
/// ```text
/// [PENDING] ──propose──→ [PENDING_INCLUSION] ──confirm──→ [removed]
///                               │
///                               └── timeout/reject ──→ [PENDING] (rollback)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransactionState {
    /// Available for block inclusion.
    #[default]
    Pending,
    /// Proposed for a block, awaiting `remove()` confirmation.
    PendingInclusion {
        /// Target block height for this proposal.
        block_height: u64,
        /// Timestamp when the transaction was proposed.
        proposed_at: Timestamp,
    },
}

/// A mempool entry together with its Two-Phase Commit state.
#[derive(Clone, Debug)]
pub struct PooledTransaction {
    /// The underlying mempool entry (tx, priority, status, timestamps).
    pub entry: MempoolEntry,
    /// Two-phase-commit state, not part of the externally visible status.
    pub state: TransactionState,
}

impl PooledTransaction {
    /// Wraps a transaction as a freshly-accepted, pending mempool entry.
    pub fn new(tx: Transaction, priority_score: u64, now: Timestamp, ttl_secs: u64) -> Self {
        Self {
            entry: MempoolEntry {
                tx,
                priority_score,
                broadcast_count: 0,
                status: MempoolStatus::Pending,
                created_at: now,
                expires_at: now.saturating_add(ttl_secs),
            },
            state: TransactionState::Pending,
        }
    }

    /// Hash of the wrapped transaction.
    #[must_use]
    pub fn hash(&self) -> Hash {
        self.entry.tx.hash
    }

    /// Sender address.
    #[must_use]
    pub fn sender(&self) -> Address {
        self.entry.tx.from
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, TransactionState::Pending)
    }

    #[must_use]
    pub fn is_pending_inclusion(&self) -> bool {
        matches!(self.state, TransactionState::PendingInclusion { .. })
    }

    /// Moves the transaction to `PendingInclusion`.
    ///
    /// # Errors
    /// Returns an error if already pending inclusion.
    pub fn propose(&mut self, block_height: u64, now: Timestamp) -> Result<(), &'static str> {
        if self.is_pending_inclusion() {
            return Err("already pending inclusion");
        }
        self.state = TransactionState::PendingInclusion {
            block_height,
            proposed_at: now,
        };
        self.entry.status = MempoolStatus::Processing;
        Ok(())
    }

    /// Returns the transaction to `Pending`.
    ///
    /// # Errors
    /// Returns an error if not currently pending inclusion.
    pub fn rollback(&mut self) -> Result<(), &'static str> {
        if !self.is_pending_inclusion() {
            return Err("not pending inclusion");
        }
        self.state = TransactionState::Pending;
        self.entry.status = MempoolStatus::Pending;
        Ok(())
    }

    /// Whether the `PendingInclusion` assembly window has elapsed.
    #[must_use]
    pub fn is_timed_out(&self, now: Timestamp, timeout_secs: u64) -> bool {
        match self.state {
            TransactionState::PendingInclusion { proposed_at, .. } => {
                now.saturating_sub(proposed_at) >= timeout_secs
            }
            TransactionState::Pending => false,
        }
    }

    /// Whether the entry's TTL has elapsed.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.entry.expires_at
    }
}

/// Mempool configuration.
#[derive(Clone, Debug)]
pub struct MempoolConfig {
    /// Hard capacity; above this, lowest-priority entries are evicted.
    pub max_transactions: usize,
    /// Maximum pending transactions per sender.
    pub max_per_account: usize,
    /// Minimum accepted fee.
    pub min_fee: u64,
    /// How long a proposed-but-unconfirmed transaction may stay in
    /// `PendingInclusion` before it is rolled back.
    pub pending_inclusion_timeout_secs: u64,
    /// Fixed residency TTL applied uniformly by `expire()`.
    pub ttl_secs: u64,
    /// Enable Replace-by-Fee.
    pub enable_rbf: bool,
    /// Minimum fee-bump percentage required for RBF.
    pub rbf_min_bump_percent: u64,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            max_transactions: 5000,
            max_per_account: 16,
            min_fee: 1,
            pending_inclusion_timeout_secs: 30,
            ttl_secs: 3600,
            enable_rbf: true,
            rbf_min_bump_percent: 10,
        }
    }
}

impl MempoolConfig {
    /// Compact configuration for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            max_transactions: 100,
            max_per_account: 4,
            pending_inclusion_timeout_secs: 1,
            ..Default::default()
        }
    }
}

/// Computes `fee / gas_limit`, falling back to `fee` alone when no gas
/// limit is specified (a plain transfer).
#[must_use]
pub fn priority_score(tx: &Transaction) -> u64 {
    match tx.gas_limit {
        Some(limit) if limit > 0 => tx.fee / limit,
        _ => tx.fee,
    }
}
