//! Ports: inbound `ResilienceApi`, outbound time/peer-stats sources.

pub mod inbound;
pub mod outbound;

pub use inbound::ResilienceApi;
pub use outbound::{PeerStatsSource, SystemTimeSource, TimeSource};
