//! Inbound (driving) port: the API other subsystems (and `node-runtime`'s
//! HTTP adapter, `POST /api/blockchain/submit`) call into.

use crate::domain::IngestError;
use shared_types::{Address, Hash};

/// Outcome of a successful ingest call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Hash of the canonical internal transaction.
    pub tx_hash: Hash,
    /// Hash of the original raw bytes (idempotency key).
    pub raw_tx_hash: Hash,
    /// `true` if this raw tx hash was already seen; `tx_hash` is the
    /// previously accepted hash, and no new mempool submission occurred.
    pub idempotent_replay: bool,
}

/// Primary port: decode, recover, and admit a raw signed transaction.
pub trait RawIngestorApi {
    /// Ingest a hex-encoded raw transaction. `expected_from`, if provided
    /// by the caller, must match the recovered sender.
    fn ingest(
        &mut self,
        raw_hex: &str,
        expected_from: Option<Address>,
    ) -> Result<IngestOutcome, IngestError>;
}
