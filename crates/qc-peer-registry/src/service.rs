//! Service orchestration: wires the peer registry behind `PeerRegistryApi`,
//! publishing `node.registered` whenever registration creates a new peer.

use crate::adapters::PeerRegistryEventPublisher;
use crate::domain::{PeerRegistry, RegistryConfig, RegistryError};
use crate::ports::{PeerRegistryApi, TimeSource};
use shared_types::{Peer, PeerStatus, PublicKey};
use std::collections::BTreeMap;

/// Default peer registry service.
pub struct PeerRegistryService<T: TimeSource, P: PeerRegistryEventPublisher> {
    registry: PeerRegistry,
    time_source: T,
    publisher: P,
}

impl<T: TimeSource, P: PeerRegistryEventPublisher> PeerRegistryService<T, P> {
    pub fn new(config: RegistryConfig, time_source: T, publisher: P) -> Self {
        Self {
            registry: PeerRegistry::new(config),
            time_source,
            publisher,
        }
    }
}

impl<T: TimeSource, P: PeerRegistryEventPublisher> PeerRegistryApi for PeerRegistryService<T, P> {
    fn register(
        &mut self,
        node_id: String,
        host: String,
        port: u16,
        public_key: PublicKey,
        version: u16,
        metadata: BTreeMap<String, String>,
    ) -> Peer {
        let now = self.time_source.now();
        let (peer, is_new) = self.registry.register(node_id, host, port, public_key, version, metadata, now);
        if is_new {
            if let Err(e) = self.publisher.publish_node_registered(&peer) {
                tracing::warn!(error = %e, node_id = %peer.node_id, "failed to publish node.registered");
            }
        }
        peer
    }

    fn get(&self, node_id: &str) -> Option<Peer> {
        self.registry.get(node_id).cloned()
    }

    fn list(&self, status: Option<PeerStatus>) -> Vec<Peer> {
        self.registry.list(status).into_iter().cloned().collect()
    }

    fn update_heartbeat(&mut self, node_id: &str, version: u16) -> Result<(), RegistryError> {
        let now = self.time_source.now();
        self.registry.update_heartbeat(node_id, version, now)
    }

    fn adjust_reputation(&mut self, node_id: &str, delta: i16) -> Result<u8, RegistryError> {
        self.registry.adjust_reputation(node_id, delta)
    }

    fn mark_inactive(&mut self, node_id: &str) -> Result<(), RegistryError> {
        self.registry.mark_inactive(node_id)
    }

    fn ban(&mut self, node_id: &str) -> Result<(), RegistryError> {
        self.registry.ban(node_id)
    }

    fn unban(&mut self, node_id: &str) -> Result<(), RegistryError> {
        self.registry.unban(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::publisher::RecordingPublisher;
    use crate::ports::outbound::MockTimeSource;

    fn service() -> PeerRegistryService<MockTimeSource, RecordingPublisher> {
        PeerRegistryService::new(
            RegistryConfig::default(),
            MockTimeSource(std::sync::atomic::AtomicU64::new(1_000)),
            RecordingPublisher::new(),
        )
    }

    #[test]
    fn registration_publishes_once_per_new_peer() {
        let mut svc = service();
        svc.register("node-a".to_string(), "10.0.0.1".to_string(), 9000, [1u8; 33], 1, BTreeMap::new());
        svc.register("node-a".to_string(), "10.0.0.1".to_string(), 9000, [1u8; 33], 1, BTreeMap::new());
        assert_eq!(svc.publisher.registered.lock().unwrap().len(), 1);
    }

    #[test]
    fn ban_excludes_from_active_listing() {
        let mut svc = service();
        svc.register("node-a".to_string(), "10.0.0.1".to_string(), 9000, [1u8; 33], 1, BTreeMap::new());
        svc.ban("node-a").unwrap();
        assert!(svc.list(Some(PeerStatus::Active)).is_empty());
    }
}
