//! Anti-replay bookkeeping shared by the sender (one entry per peer
//! broadcast to) and the receiver (one entry keyed by the local node, used
//! to dedupe a retransmitted event).

use shared_types::BroadcastTrack;
use std::collections::HashMap;

pub const DEFAULT_TTL_SECS: u64 = 3600;

type TrackKey = (String, String, String);

#[derive(Default)]
pub struct BroadcastTrackStore {
    entries: HashMap<TrackKey, BroadcastTrack>,
}

impl BroadcastTrackStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one hop of `tx_hash`'s broadcast trail, keyed by
    /// `(tx_hash, source_node_id, current_node_id)`. Returns `false` if this
    /// exact triple was already tracked (a duplicate the caller should drop).
    pub fn record(
        &mut self,
        tx_hash: &str,
        source_node_id: &str,
        current_node_id: &str,
        hop_count: u8,
        path: Vec<String>,
        now: u64,
        ttl_secs: u64,
    ) -> bool {
        let key = (tx_hash.to_string(), source_node_id.to_string(), current_node_id.to_string());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(
            key,
            BroadcastTrack {
                tx_hash: tx_hash.to_string(),
                source_node_id: source_node_id.to_string(),
                current_node_id: current_node_id.to_string(),
                hop_count,
                path,
                expires_at: now.saturating_add(ttl_secs),
            },
        );
        true
    }

    pub fn purge_expired(&mut self, now: u64) {
        self.entries.retain(|_, t| t.expires_at > now);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_triple_is_rejected() {
        let mut store = BroadcastTrackStore::new();
        assert!(store.record("tx1", "n1", "n2", 1, vec!["n1".into()], 100, DEFAULT_TTL_SECS));
        assert!(!store.record("tx1", "n1", "n2", 1, vec!["n1".into()], 100, DEFAULT_TTL_SECS));
    }

    #[test]
    fn expired_entries_are_purged() {
        let mut store = BroadcastTrackStore::new();
        store.record("tx1", "n1", "n2", 1, vec![], 100, 10);
        store.purge_expired(150);
        assert!(store.is_empty());
    }
}
