//! Outbound (driven) ports: what the raw ingestor needs from the rest of
//! the node.

use shared_types::{Hash, Transaction};
use thiserror::Error;

/// Error surfaced when the mempool declines a decoded transaction.
#[derive(Debug, Error)]
#[error("mempool rejected transaction: {0}")]
pub struct MempoolSinkError(pub String);

/// Hands a decoded, sender-recovered transaction to the mempool.
///
/// Implemented in `node-runtime` by an adapter over `qc-mempool`'s
/// `MempoolApi`; kept as a local port so this crate never depends on
/// `qc-mempool` directly.
pub trait MempoolSink: Send + Sync {
    /// Submit `tx` for admission. Returns the accepted transaction's hash.
    fn submit(&mut self, tx: Transaction) -> Result<Hash, MempoolSinkError>;
}

#[cfg(test)]
pub struct RecordingMempoolSink {
    pub accepted: Vec<Transaction>,
    pub reject_all: bool,
}

#[cfg(test)]
impl RecordingMempoolSink {
    pub fn new() -> Self {
        Self {
            accepted: Vec::new(),
            reject_all: false,
        }
    }
}

#[cfg(test)]
impl MempoolSink for RecordingMempoolSink {
    fn submit(&mut self, tx: Transaction) -> Result<Hash, MempoolSinkError> {
        if self.reject_all {
            return Err(MempoolSinkError("rejected for test".into()));
        }
        let hash = tx.hash;
        self.accepted.push(tx);
        Ok(hash)
    }
}
