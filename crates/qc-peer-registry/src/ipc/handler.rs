//! Wire handlers translating IPC payloads to `PeerRegistryApi` calls.

use crate::ports::PeerRegistryApi;
use shared_types::{PeerListRequestPayload, PeerListResponsePayload, PeerStatus};

/// Handles a `PeerListRequestPayload`, returning up to `max_peers` active
/// peers meeting `min_reputation`, highest reputation first.
pub fn handle_peer_list_request(
    api: &dyn PeerRegistryApi,
    request: &PeerListRequestPayload,
) -> PeerListResponsePayload {
    let mut peers = api.list(Some(PeerStatus::Active));
    if let Some(min_rep) = request.min_reputation {
        peers.retain(|p| p.reputation_score >= min_rep);
    }
    peers.sort_by_key(|p| std::cmp::Reverse(p.reputation_score));
    peers.truncate(request.max_peers as usize);
    PeerListResponsePayload { peers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::publisher::NoOpPublisher;
    use crate::domain::RegistryConfig;
    use crate::ports::SystemTimeSource;
    use crate::service::PeerRegistryService;
    use std::collections::BTreeMap;

    #[test]
    fn filters_by_min_reputation_and_caps_count() {
        let mut svc = PeerRegistryService::new(RegistryConfig::default(), SystemTimeSource, NoOpPublisher);
        svc.register("a".to_string(), "h1".to_string(), 1, [0u8; 33], 1, BTreeMap::new());
        svc.register("b".to_string(), "h2".to_string(), 1, [1u8; 33], 1, BTreeMap::new());
        svc.adjust_reputation("a", 40).unwrap();

        let response = handle_peer_list_request(
            &svc,
            &PeerListRequestPayload {
                max_peers: 10,
                min_reputation: Some(80),
            },
        );
        assert_eq!(response.peers.len(), 1);
        assert_eq!(response.peers[0].node_id, "a");
    }
}
