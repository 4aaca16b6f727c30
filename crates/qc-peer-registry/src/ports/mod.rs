//! Ports: inbound `PeerRegistryApi`, outbound time source.

pub mod inbound;
pub mod outbound;

pub use inbound::PeerRegistryApi;
pub use outbound::{SystemTimeSource, TimeSource};
