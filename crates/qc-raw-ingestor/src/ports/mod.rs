//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - `inbound::RawIngestorApi` — what callers invoke to submit a raw tx.
//! - `outbound::MempoolSink` — where accepted transactions are handed off.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
