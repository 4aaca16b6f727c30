//! Event publisher adapter for the peer registry subsystem.

use shared_types::{NodeRegisteredPayload, Peer};

/// Topics published by the peer registry.
pub mod topics {
    /// A new peer completed registration.
    pub const NODE_REGISTERED: &str = "node.registered";
}

/// Error type for publish operations.
#[derive(Debug, Clone)]
pub enum PublishError {
    NotConnected,
    Internal(String),
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "event bus not connected"),
            Self::Internal(e) => write!(f, "internal error: {e}"),
        }
    }
}

impl std::error::Error for PublishError {}

/// Event publisher trait for the peer registry.
pub trait PeerRegistryEventPublisher: Send + Sync {
    /// Publishes `node.registered` for a newly registered peer. Receivers:
    /// `qc-event-sync` (adds the peer to fan-out), `qc-resilience` (starts
    /// tracking its circuits/health).
    fn publish_node_registered(&self, peer: &Peer) -> Result<(), PublishError>;
}

/// No-op publisher for use without a connected event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl PeerRegistryEventPublisher for NoOpPublisher {
    fn publish_node_registered(&self, _peer: &Peer) -> Result<(), PublishError> {
        Ok(())
    }
}

#[cfg(test)]
pub struct RecordingPublisher {
    pub registered: std::sync::Mutex<Vec<NodeRegisteredPayload>>,
}

#[cfg(test)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            registered: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl PeerRegistryEventPublisher for RecordingPublisher {
    fn publish_node_registered(&self, peer: &Peer) -> Result<(), PublishError> {
        self.registered.lock().unwrap().push(NodeRegisteredPayload { peer: peer.clone() });
        Ok(())
    }
}
