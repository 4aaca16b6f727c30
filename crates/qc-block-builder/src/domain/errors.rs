//! Block builder error types.

use thiserror::Error;

/// `BlockBuilder.pack()` failure modes.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The local node was not selected as leader for the target height.
    #[error("local node is not the selected leader for this height")]
    NotLeader,

    /// The mempool had nothing eligible to include.
    #[error("mempool is empty")]
    EmptyMempool,

    /// `ChainStore.append` rejected the assembled block (another block
    /// landed at this height first, or the parent no longer matches).
    #[error("append conflict: {0}")]
    AppendConflict(String),

    /// Signing the assembled block failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}
