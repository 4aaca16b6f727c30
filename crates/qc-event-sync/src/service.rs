//! Wires the event queue, broadcast-track store, and HMAC security behind
//! `EventSyncApi`.

use crate::domain::{
    decide_broadcast, BroadcastDecision, BroadcastTrackStore, Event, EventQueue, EventSyncError, EventType,
    DEFAULT_MAX_HOPS, DEFAULT_TTL_SECS,
};
use crate::domain::security::{sign_body, verify_body};
use crate::ports::inbound::{BroadcastTarget, EventSyncApi, ReceiveOutcome};
use crate::ports::outbound::{CircuitGate, PeerDirectory, TimeSource};

const BROADCAST_OPERATION: &str = "broadcast";

pub struct EventSyncService<T: TimeSource, C: CircuitGate, P: PeerDirectory> {
    node_id: String,
    hmac_secret: Vec<u8>,
    max_hops: u8,
    queue: EventQueue,
    tracks: BroadcastTrackStore,
    time_source: T,
    circuit: C,
    peers: P,
}

impl<T: TimeSource, C: CircuitGate, P: PeerDirectory> EventSyncService<T, C, P> {
    pub fn new(node_id: impl Into<String>, hmac_secret: Vec<u8>, high_water_mark: usize, time_source: T, circuit: C, peers: P) -> Self {
        Self {
            node_id: node_id.into(),
            hmac_secret,
            max_hops: DEFAULT_MAX_HOPS,
            queue: EventQueue::new(high_water_mark),
            tracks: BroadcastTrackStore::new(),
            time_source,
            circuit,
            peers,
        }
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

impl<T: TimeSource, C: CircuitGate, P: PeerDirectory> EventSyncApi for EventSyncService<T, C, P> {
    fn publish(&mut self, event_type: EventType, payload: Vec<u8>) -> Result<Event, EventSyncError> {
        let now = self.time_source.now();
        let event = Event::originate(uuid::Uuid::new_v4().to_string(), event_type, payload, self.node_id.clone(), now);
        self.queue.push(event.clone())?;
        Ok(event)
    }

    fn pop_for_dispatch(&mut self) -> Option<Event> {
        self.queue.pop()
    }

    fn receive(&mut self, mut event: Event, body: &[u8], signature_hex: &str) -> Result<(Event, ReceiveOutcome), EventSyncError> {
        if !verify_body(&self.hmac_secret, body, signature_hex) {
            tracing::warn!(event_id = %event.id, source = %event.source_node_id, "rejected event with invalid broadcast signature");
            return Err(EventSyncError::AuthError);
        }
        let now = self.time_source.now();
        let accepted = self
            .tracks
            .record(&event.id, &event.source_node_id, &self.node_id, event.hop_count, event.path.clone(), now, DEFAULT_TTL_SECS);
        if !accepted {
            return Ok((event, ReceiveOutcome::DedupeSkipped));
        }
        event.record_hop(self.node_id.clone());
        self.queue.push(event.clone())?;
        Ok((event, ReceiveOutcome::Accepted))
    }

    fn broadcast_plan(&mut self, event: &Event, _body: &[u8]) -> Vec<BroadcastTarget> {
        let now = self.time_source.now();
        let mut targets = Vec::new();
        for peer_id in self.peers.broadcastable_peers() {
            let allows = self.circuit.allow_request(&peer_id, BROADCAST_OPERATION);
            if decide_broadcast(event, &peer_id, allows, self.max_hops) != BroadcastDecision::Send {
                continue;
            }
            let body = event.payload.as_slice();
            let signature_hex = sign_body(&self.hmac_secret, body);
            self.tracks
                .record(&event.id, &event.source_node_id, &peer_id, event.hop_count, event.path.clone(), now, DEFAULT_TTL_SECS);
            targets.push(BroadcastTarget { peer_id, signature_hex });
        }
        targets
    }

    fn record_broadcast_result(&mut self, peer_id: &str, success: bool) {
        if success {
            self.circuit.record_success(peer_id, BROADCAST_OPERATION);
        } else {
            self.circuit.record_failure(peer_id, BROADCAST_OPERATION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::{AllowAllGate, FixedPeers, MockTimeSource};
    use std::sync::atomic::AtomicU64;

    fn service() -> EventSyncService<MockTimeSource, AllowAllGate, FixedPeers> {
        EventSyncService::new(
            "local",
            b"secret".to_vec(),
            10,
            MockTimeSource(AtomicU64::new(1_000)),
            AllowAllGate,
            FixedPeers(vec!["p1".to_string(), "p2".to_string()]),
        )
    }

    #[test]
    fn publish_enqueues_and_pops_in_priority_order() {
        let mut svc = service();
        svc.publish(EventType::Heartbeat, vec![]).unwrap();
        svc.publish(EventType::BlockCreated, vec![1]).unwrap();
        let first = svc.pop_for_dispatch().unwrap();
        assert_eq!(first.event_type, EventType::BlockCreated);
    }

    #[test]
    fn receive_rejects_bad_signature() {
        let mut svc = service();
        let event = Event::originate("e1", EventType::TxReceived, vec![9], "remote", 1_000);
        let err = svc.receive(event, b"body", "deadbeef").unwrap_err();
        assert!(matches!(err, EventSyncError::AuthError));
    }

    #[test]
    fn receive_dedupes_identical_replay() {
        let mut svc = service();
        let event = Event::originate("e1", EventType::TxReceived, vec![9], "remote", 1_000);
        let sig = crate::domain::security::sign_body(b"secret", b"body");
        let (_, outcome1) = svc.receive(event.clone(), b"body", &sig).unwrap();
        assert_eq!(outcome1, ReceiveOutcome::Accepted);
        let (_, outcome2) = svc.receive(event, b"body", &sig).unwrap();
        assert_eq!(outcome2, ReceiveOutcome::DedupeSkipped);
    }

    #[test]
    fn broadcast_plan_skips_peer_already_in_path() {
        let mut svc = service();
        let mut event = Event::originate("e1", EventType::BlockCreated, vec![1], "local", 1_000);
        event.path.push("p1".to_string());
        let targets = svc.broadcast_plan(&event, b"body");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].peer_id, "p2");
    }
}
