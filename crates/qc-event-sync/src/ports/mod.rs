pub mod inbound;
pub mod outbound;

pub use inbound::{BroadcastTarget, EventSyncApi, ReceiveOutcome};
pub use outbound::{BroadcastTransport, CircuitGate, PeerDirectory, TimeSource, TransportError};
