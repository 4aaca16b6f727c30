//! Sync-check reconciliation: detect when the local chain is lagging the
//! network and select a peer to catch up from.

use std::collections::HashMap;

/// A peer's reported height and standing, as seen by the health monitor.
#[derive(Debug, Clone)]
pub struct PeerHeight {
    pub node_id: String,
    pub height: u64,
    pub reputation_score: u8,
}

/// Raised when the local node has fallen `syncThreshold` or more blocks
/// behind the best-known peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTrigger {
    pub local_height: u64,
    pub target_height: u64,
    pub source_peer_id: String,
}

/// `syncCheckInterval` pass: compares `local_height` against the heights
/// reported by `peers`, raising a trigger once the gap exceeds
/// `sync_threshold`. The source peer is the one reporting the highest
/// height (ties broken by reputation).
#[must_use]
pub fn check_sync_needed(local_height: u64, peers: &[PeerHeight], sync_threshold: u64) -> Option<SyncTrigger> {
    let best = peers
        .iter()
        .max_by_key(|p| (p.height, p.reputation_score))?;
    if best.height.saturating_sub(local_height) > sync_threshold {
        Some(SyncTrigger {
            local_height,
            target_height: best.height,
            source_peer_id: best.node_id.clone(),
        })
    } else {
        None
    }
}

/// Temporary peer exclusion following a reconciliation failure.
#[derive(Debug, Default)]
pub struct PeerBlacklist {
    banned_until: HashMap<String, u64>,
}

impl PeerBlacklist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blacklist(&mut self, node_id: &str, until: u64) {
        self.banned_until.insert(node_id.to_string(), until);
    }

    #[must_use]
    pub fn is_blacklisted(&self, node_id: &str, now: u64) -> bool {
        self.banned_until.get(node_id).is_some_and(|&until| now < until)
    }
}

/// Picks the highest-reputation peer that can serve up to `target_height`
/// and isn't currently blacklisted, for sequential block reconciliation.
/// Subsequent calls (after blacklisting a peer that failed validation)
/// naturally fall through to the next-best candidate.
#[must_use]
pub fn select_reconciliation_peer<'a>(
    peers: &'a [PeerHeight],
    target_height: u64,
    blacklist: &PeerBlacklist,
    now: u64,
) -> Option<&'a PeerHeight> {
    peers
        .iter()
        .filter(|p| p.height >= target_height && !blacklist.is_blacklisted(&p.node_id, now))
        .max_by_key(|p| p.reputation_score)
}

/// Splits `[from_height, to_height]` into inclusive batches of at most
/// `batch_size` heights each, in ascending order.
#[must_use]
pub fn batch_ranges(from_height: u64, to_height: u64, batch_size: u64) -> Vec<(u64, u64)> {
    let mut ranges = Vec::new();
    let mut cursor = from_height;
    while cursor <= to_height {
        let end = (cursor + batch_size - 1).min(to_height);
        ranges.push((cursor, end));
        cursor = end + 1;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(id: &str, height: u64, reputation: u8) -> PeerHeight {
        PeerHeight {
            node_id: id.to_string(),
            height,
            reputation_score: reputation,
        }
    }

    #[test]
    fn no_trigger_within_threshold() {
        let peers = vec![peer("a", 103, 50)];
        assert!(check_sync_needed(100, &peers, 5).is_none());
    }

    #[test]
    fn trigger_beyond_threshold_names_best_peer() {
        let peers = vec![peer("a", 110, 50), peer("b", 90, 90)];
        let trigger = check_sync_needed(100, &peers, 5).unwrap();
        assert_eq!(trigger.target_height, 110);
        assert_eq!(trigger.source_peer_id, "a");
    }

    #[test]
    fn reconciliation_skips_blacklisted_peers() {
        let peers = vec![peer("a", 110, 90), peer("b", 110, 50)];
        let mut blacklist = PeerBlacklist::new();
        blacklist.blacklist("a", 1_000);
        let chosen = select_reconciliation_peer(&peers, 110, &blacklist, 100).unwrap();
        assert_eq!(chosen.node_id, "b");
    }

    #[test]
    fn batches_split_inclusive_ranges() {
        assert_eq!(batch_ranges(1, 10, 4), vec![(1, 4), (5, 8), (9, 10)]);
        assert_eq!(batch_ranges(5, 5, 4), vec![(5, 5)]);
    }
}
