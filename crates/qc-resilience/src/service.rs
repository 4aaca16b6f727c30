//! Service orchestration: wires the circuit breaker registry and health
//! monitor behind `ResilienceApi`, publishing transitions and sync
//! triggers as they occur.

use crate::adapters::ResilienceEventPublisher;
use crate::domain::{
    adaptive_interval_secs, check_sync_needed, select_reconciliation_peer, BreakerConfig,
    CircuitBreakerRegistry, NetworkConditions, PeerBlacklist, PeerHeight, SyncTrigger,
};
use crate::ports::{PeerStatsSource, ResilienceApi, TimeSource};
use shared_types::SyncManualTriggerPayload;

/// Sync reconciliation is triggered once the best peer is more than this
/// many blocks ahead of the local tip.
const DEFAULT_SYNC_THRESHOLD: u64 = 5;

/// Default resilience service.
pub struct ResilienceService<T: TimeSource, S: PeerStatsSource, P: ResilienceEventPublisher> {
    breaker: CircuitBreakerRegistry,
    blacklist: PeerBlacklist,
    sync_threshold: u64,
    time_source: T,
    peer_stats: S,
    publisher: P,
}

impl<T: TimeSource, S: PeerStatsSource, P: ResilienceEventPublisher> ResilienceService<T, S, P> {
    pub fn new(config: BreakerConfig, time_source: T, peer_stats: S, publisher: P) -> Self {
        Self {
            breaker: CircuitBreakerRegistry::new(config),
            blacklist: PeerBlacklist::new(),
            sync_threshold: DEFAULT_SYNC_THRESHOLD,
            time_source,
            peer_stats,
            publisher,
        }
    }
}

impl<T: TimeSource, S: PeerStatsSource, P: ResilienceEventPublisher> ResilienceApi for ResilienceService<T, S, P> {
    fn allow_request(&mut self, peer_id: &str, operation: &str) -> bool {
        let now = self.time_source.now();
        self.breaker.allow_request(peer_id, operation, now)
    }

    fn record_success(&mut self, peer_id: &str, operation: &str) {
        let now = self.time_source.now();
        if let Some(transition) = self.breaker.record_success(peer_id, operation, now) {
            let _ = self
                .publisher
                .publish_circuit_transition(peer_id, operation, transition.from, transition.to);
        }
    }

    fn record_failure(&mut self, peer_id: &str, operation: &str) {
        let now = self.time_source.now();
        if let Some(transition) = self.breaker.record_failure(peer_id, operation, now) {
            let _ = self
                .publisher
                .publish_circuit_transition(peer_id, operation, transition.from, transition.to);
        }
    }

    fn heartbeat_interval_secs(&self) -> u64 {
        adaptive_interval_secs(NetworkConditions {
            active_peers: self.peer_stats.active_peer_count(),
            avg_response_time_secs: self.peer_stats.avg_response_time_secs(),
            recent_failures: self.peer_stats.recent_failure_count(),
        })
    }

    fn check_sync(&self, local_height: u64) -> Option<SyncTrigger> {
        let peers = self.peer_stats.active_peer_heights();
        let trigger = check_sync_needed(local_height, &peers, self.sync_threshold)?;
        let _ = self.publisher.publish_sync_manual_trigger(SyncManualTriggerPayload {
            local_height: trigger.local_height,
            target_height: trigger.target_height,
            source_peer_id: trigger.source_peer_id.clone(),
        });
        Some(trigger)
    }

    fn blacklist_peer(&mut self, peer_id: &str, cooldown_secs: u64) {
        let now = self.time_source.now();
        self.blacklist.blacklist(peer_id, now + cooldown_secs);
    }

    fn select_reconciliation_peer(&self, peers: &[PeerHeight], target_height: u64) -> Option<String> {
        let now = self.time_source.now();
        select_reconciliation_peer(peers, target_height, &self.blacklist, now).map(|p| p.node_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::publisher::RecordingPublisher;
    use crate::ports::outbound::{MockPeerStats, MockTimeSource};

    fn service(heights: Vec<PeerHeight>) -> ResilienceService<MockTimeSource, MockPeerStats, RecordingPublisher> {
        ResilienceService::new(
            BreakerConfig::default(),
            MockTimeSource(std::sync::atomic::AtomicU64::new(0)),
            MockPeerStats {
                heights,
                active_count: 10,
                avg_response_time_secs: 0.2,
                recent_failures: 0,
            },
            RecordingPublisher::new(),
        )
    }

    #[test]
    fn circuit_trip_publishes_transition() {
        let mut svc = service(vec![]);
        for _ in 0..5 {
            svc.record_failure("peer1", "broadcast");
            svc.time_source.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
        assert_eq!(svc.publisher.transitions.lock().unwrap().len(), 1);
        assert!(!svc.allow_request("peer1", "broadcast"));
    }

    #[test]
    fn sync_check_publishes_trigger_when_lagging() {
        let svc = service(vec![PeerHeight {
            node_id: "peer1".to_string(),
            height: 110,
            reputation_score: 90,
        }]);
        let trigger = svc.check_sync(100).unwrap();
        assert_eq!(trigger.target_height, 110);
        assert_eq!(svc.publisher.triggers.lock().unwrap().len(), 1);
    }
}
