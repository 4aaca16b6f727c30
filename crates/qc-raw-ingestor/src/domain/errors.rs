//! Decode and acceptance errors for raw transaction ingestion.

use thiserror::Error;

/// Errors raised while decoding and admitting a raw signed transaction.
#[derive(Debug, Error)]
pub enum IngestError {
    /// RLP decoding failed or the payload does not match a known envelope.
    #[error("malformed transaction: {0}")]
    ParseError(String),

    /// An unsupported transaction type byte was found in a typed envelope.
    #[error("unsupported transaction type: 0x{0:02x}")]
    UnsupportedType(u8),

    /// Signature recovery failed, or the recovered address does not match
    /// the caller-supplied `from` address.
    #[error("signature error: {0}")]
    SignatureError(String),

    /// The mempool rejected the decoded transaction.
    #[error("rejected by mempool: {0}")]
    MempoolRejected(String),
}
