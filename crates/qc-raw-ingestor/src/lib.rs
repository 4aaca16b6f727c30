//! # Raw Ingestor
//!
//! Accepts externally-signed, RLP-encoded Ethereum-style transactions
//! (legacy and EIP-1559 typed-2), recovers the sender from the signature
//! alone, derives the canonical internal transaction, and admits it to the
//! mempool.
//!
//! ```text
//! hex string ──decode──→ RLP fields ──recover──→ sender ──┐
//!                                                          ▼
//!                                     canonical Transaction ──submit──→ MempoolSink
//! ```
//!
//! Idempotent: resubmitting the same raw bytes returns the hash from the
//! first acceptance rather than inserting a duplicate.
//!
//! ## Module structure (hexagonal architecture)
//!
//! ```text
//! domain/   - RLP decoding, signature recovery, canonical hashing
//! ports/    - RawIngestorApi (inbound), MempoolSink (outbound)
//! adapters/ - tx.received event publisher
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::RawIngestorService;
