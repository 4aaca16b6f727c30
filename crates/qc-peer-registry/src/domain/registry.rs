//! `PeerRegistry`: the known-peer set. Peers are registered on first
//! contact, refreshed on every heartbeat or sync, and excluded from
//! fan-out once banned.

use super::errors::RegistryError;
use shared_types::{Peer, PeerStatus, PublicKey};
use std::collections::{BTreeMap, HashMap};

/// Registry-level policy.
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// Reputation score assigned to a newly registered peer.
    pub default_reputation: u8,
    /// Reputation floor and ceiling; `adjustReputation` clamps to this range.
    pub reputation_bounds: (u8, u8),
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_reputation: 50,
            reputation_bounds: (0, 100),
        }
    }
}

/// The known-peer set, keyed by `node_id`.
pub struct PeerRegistry {
    config: RegistryConfig,
    peers: HashMap<String, Peer>,
}

impl PeerRegistry {
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            peers: HashMap::new(),
        }
    }

    /// Finds an existing peer sharing `host` (the primary uniqueness key)
    /// or the same `(host, port, public_key)` triple.
    fn find_conflict(&self, host: &str, port: u16, public_key: &PublicKey) -> Option<&Peer> {
        self.peers.values().find(|p| {
            p.host == host || (p.host == host && p.port == port && &p.public_key == public_key)
        })
    }

    /// `register`: first contact creates a new `Active` peer; a conflicting
    /// `host` or `(host, port, public_key)` returns the existing record
    /// rather than erroring. Returns `(peer, is_new)`.
    pub fn register(
        &mut self,
        node_id: String,
        host: String,
        port: u16,
        public_key: PublicKey,
        version: u16,
        metadata: BTreeMap<String, String>,
        now: u64,
    ) -> (Peer, bool) {
        if let Some(existing) = self.peers.get(&node_id) {
            return (existing.clone(), false);
        }
        if let Some(existing) = self.find_conflict(&host, port, &public_key) {
            return (existing.clone(), false);
        }
        let peer = Peer {
            node_id: node_id.clone(),
            host,
            port,
            public_key,
            version,
            status: PeerStatus::Active,
            reputation_score: self.config.default_reputation,
            last_seen: now,
            metadata,
        };
        self.peers.insert(node_id, peer.clone());
        (peer, true)
    }

    /// Looks up a peer by node id.
    #[must_use]
    pub fn get(&self, node_id: &str) -> Option<&Peer> {
        self.peers.get(node_id)
    }

    /// Lists peers, optionally filtered to a single status.
    #[must_use]
    pub fn list(&self, status: Option<PeerStatus>) -> Vec<&Peer> {
        self.peers
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .collect()
    }

    /// `updateHeartbeat`: refreshes `last_seen`/`version` from a received
    /// heartbeat. Reactivates an `Inactive` peer; a `Banned` peer stays
    /// banned.
    pub fn update_heartbeat(&mut self, node_id: &str, version: u16, now: u64) -> Result<(), RegistryError> {
        let peer = self
            .peers
            .get_mut(node_id)
            .ok_or_else(|| RegistryError::NotFound(node_id.to_string()))?;
        peer.last_seen = now;
        peer.version = version;
        if peer.status == PeerStatus::Inactive {
            peer.status = PeerStatus::Active;
        }
        Ok(())
    }

    /// `adjustReputation`: applies `delta`, clamped to the configured
    /// bounds. Used by `ChainStore`/`CircuitBreaker`/`EventSync` to penalize
    /// peers sending invalid data or going unresponsive.
    pub fn adjust_reputation(&mut self, node_id: &str, delta: i16) -> Result<u8, RegistryError> {
        let (lo, hi) = self.config.reputation_bounds;
        let peer = self
            .peers
            .get_mut(node_id)
            .ok_or_else(|| RegistryError::NotFound(node_id.to_string()))?;
        let updated = i16::from(peer.reputation_score) + delta;
        peer.reputation_score = updated.clamp(i16::from(lo), i16::from(hi)) as u8;
        Ok(peer.reputation_score)
    }

    /// Marks a peer inactive after missed heartbeats, short of a ban.
    pub fn mark_inactive(&mut self, node_id: &str) -> Result<(), RegistryError> {
        let peer = self
            .peers
            .get_mut(node_id)
            .ok_or_else(|| RegistryError::NotFound(node_id.to_string()))?;
        if peer.status == PeerStatus::Active {
            peer.status = PeerStatus::Inactive;
        }
        Ok(())
    }

    /// `ban`: excludes a peer from all fan-out and reconciliation
    /// selection following repeated integrity violations.
    pub fn ban(&mut self, node_id: &str) -> Result<(), RegistryError> {
        let peer = self
            .peers
            .get_mut(node_id)
            .ok_or_else(|| RegistryError::NotFound(node_id.to_string()))?;
        peer.status = PeerStatus::Banned;
        Ok(())
    }

    /// Lifts a ban, returning the peer to `Active`.
    pub fn unban(&mut self, node_id: &str) -> Result<(), RegistryError> {
        let peer = self
            .peers
            .get_mut(node_id)
            .ok_or_else(|| RegistryError::NotFound(node_id.to_string()))?;
        peer.status = PeerStatus::Active;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PeerRegistry {
        PeerRegistry::new(RegistryConfig::default())
    }

    #[test]
    fn register_by_host_returns_existing_on_conflict() {
        let mut r = registry();
        let (first, is_new) = r.register(
            "node-a".to_string(),
            "10.0.0.1".to_string(),
            9000,
            [1u8; 33],
            1,
            BTreeMap::new(),
            1_000,
        );
        assert!(is_new);
        let (second, is_new) = r.register(
            "node-b".to_string(),
            "10.0.0.1".to_string(),
            9001,
            [2u8; 33],
            1,
            BTreeMap::new(),
            1_001,
        );
        assert!(!is_new);
        assert_eq!(second.node_id, first.node_id);
        assert_eq!(r.list(None).len(), 1);
    }

    #[test]
    fn adjust_reputation_clamps_to_bounds() {
        let mut r = registry();
        r.register("node-a".to_string(), "10.0.0.1".to_string(), 9000, [1u8; 33], 1, BTreeMap::new(), 0);
        assert_eq!(r.adjust_reputation("node-a", -1_000).unwrap(), 0);
        assert_eq!(r.adjust_reputation("node-a", 1_000).unwrap(), 100);
    }

    #[test]
    fn banned_peer_excluded_from_active_list() {
        let mut r = registry();
        r.register("node-a".to_string(), "10.0.0.1".to_string(), 9000, [1u8; 33], 1, BTreeMap::new(), 0);
        r.ban("node-a").unwrap();
        assert!(r.list(Some(PeerStatus::Active)).is_empty());
        assert_eq!(r.list(Some(PeerStatus::Banned)).len(), 1);
    }

    #[test]
    fn heartbeat_reactivates_inactive_peer() {
        let mut r = registry();
        r.register("node-a".to_string(), "10.0.0.1".to_string(), 9000, [1u8; 33], 1, BTreeMap::new(), 0);
        r.mark_inactive("node-a").unwrap();
        assert_eq!(r.get("node-a").unwrap().status, PeerStatus::Inactive);
        r.update_heartbeat("node-a", 2, 500).unwrap();
        let peer = r.get("node-a").unwrap();
        assert_eq!(peer.status, PeerStatus::Active);
        assert_eq!(peer.last_seen, 500);
        assert_eq!(peer.version, 2);
    }

    #[test]
    fn unknown_peer_operations_fail() {
        let mut r = registry();
        assert!(matches!(r.ban("ghost"), Err(RegistryError::NotFound(_))));
    }
}
