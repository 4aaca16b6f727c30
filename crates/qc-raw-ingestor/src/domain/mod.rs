//! # Domain Layer — Raw Ingestor
//!
//! RLP decoding of externally-signed transactions and derivation of the
//! canonical internal [`shared_types::Transaction`].

pub mod errors;
pub mod raw_tx;

pub use errors::IngestError;
pub use raw_tx::{decode_raw_transaction, DecodedTransaction};
