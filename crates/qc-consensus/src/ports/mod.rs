//! Ports: inbound `ConsensusApi`, outbound time/signing-key sources.

pub mod inbound;
pub mod outbound;

pub use inbound::ConsensusApi;
pub use outbound::{SigningKeySource, SystemTimeSource, TimeSource};
