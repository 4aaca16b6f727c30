//! Outbound (driven) ports for the resilience subsystem.

use crate::domain::PeerHeight;

/// Time source for consistent, testable timestamp handling.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> u64;
}

/// Default system time source.
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

/// Supplies live network conditions, backed by `qc-peer-registry` and its
/// own request-timing bookkeeping.
pub trait PeerStatsSource: Send + Sync {
    /// Heights last reported by each active peer.
    fn active_peer_heights(&self) -> Vec<PeerHeight>;

    /// Count of currently `Active` peers.
    fn active_peer_count(&self) -> usize;

    /// Average recent response time across peers, in seconds.
    fn avg_response_time_secs(&self) -> f64;

    /// Failures observed across all circuits in the recent window.
    fn recent_failure_count(&self) -> u32;
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
pub struct MockPeerStats {
    pub heights: Vec<PeerHeight>,
    pub active_count: usize,
    pub avg_response_time_secs: f64,
    pub recent_failures: u32,
}

#[cfg(test)]
impl PeerStatsSource for MockPeerStats {
    fn active_peer_heights(&self) -> Vec<PeerHeight> {
        self.heights.clone()
    }

    fn active_peer_count(&self) -> usize {
        self.active_count
    }

    fn avg_response_time_secs(&self) -> f64 {
        self.avg_response_time_secs
    }

    fn recent_failure_count(&self) -> u32 {
        self.recent_failures
    }
}
