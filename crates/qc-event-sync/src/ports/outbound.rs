//! Outbound (driven) ports: crate-local dependencies on `qc-resilience`'s
//! circuit breaker and `qc-peer-registry`'s active-peer listing, kept as
//! ports so this crate never depends on either concretely.

/// Time source for consistent, testable timestamp handling.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Gate consulted before each per-peer broadcast attempt, keyed per
/// `(peer_id, operation)`.
pub trait CircuitGate: Send + Sync {
    fn allow_request(&self, peer_id: &str, operation: &str) -> bool;
    fn record_success(&mut self, peer_id: &str, operation: &str);
    fn record_failure(&mut self, peer_id: &str, operation: &str);
}

/// Peers eligible to receive a broadcast, sourced from the registry.
pub trait PeerDirectory: Send + Sync {
    fn broadcastable_peers(&self) -> Vec<String>;
}

/// The actual HTTP transport; the broadcaster pool uses this to deliver a
/// signed event to one peer.
pub trait BroadcastTransport: Send + Sync {
    fn send(&self, peer_id: &str, event: &crate::domain::Event, signature_hex: &str) -> Result<(), TransportError>;
}

#[derive(Debug, Clone)]
pub enum TransportError {
    Timeout,
    Unreachable(String),
    ThrottledByPeer,
}

#[cfg(test)]
pub struct MockTimeSource(pub std::sync::atomic::AtomicU64);

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> u64 {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
pub struct AllowAllGate;

#[cfg(test)]
impl CircuitGate for AllowAllGate {
    fn allow_request(&self, _peer_id: &str, _operation: &str) -> bool {
        true
    }
    fn record_success(&mut self, _peer_id: &str, _operation: &str) {}
    fn record_failure(&mut self, _peer_id: &str, _operation: &str) {}
}

#[cfg(test)]
pub struct FixedPeers(pub Vec<String>);

#[cfg(test)]
impl PeerDirectory for FixedPeers {
    fn broadcastable_peers(&self) -> Vec<String> {
        self.0.clone()
    }
}
