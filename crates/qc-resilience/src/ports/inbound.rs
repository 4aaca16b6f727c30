//! # Inbound Port — ResilienceApi
//!
//! Primary driving port: the circuit breaker guards outbound calls from
//! `qc-event-sync`/`qc-peer-registry`; the health monitor decides the
//! node's heartbeat cadence and whether a sync reconciliation is due.

use crate::domain::{PeerHeight, SyncTrigger};

/// Primary API for the resilience subsystem.
pub trait ResilienceApi: Send + Sync {
    /// Whether a call to `(peer_id, operation)` may proceed right now.
    fn allow_request(&mut self, peer_id: &str, operation: &str) -> bool;

    /// Records a successful call.
    fn record_success(&mut self, peer_id: &str, operation: &str);

    /// Records a failed call, possibly tripping the circuit open.
    fn record_failure(&mut self, peer_id: &str, operation: &str);

    /// Next heartbeat interval, in seconds, under current conditions.
    fn heartbeat_interval_secs(&self) -> u64;

    /// Runs a sync-check pass against the currently known peer heights,
    /// returning a trigger if the local node has fallen behind.
    fn check_sync(&self, local_height: u64) -> Option<SyncTrigger>;

    /// Blacklists a peer for `cooldown_secs` following a reconciliation
    /// failure (e.g. a block it served failed validation).
    fn blacklist_peer(&mut self, peer_id: &str, cooldown_secs: u64);

    /// Selects the next reconciliation candidate for `target_height`.
    fn select_reconciliation_peer(&self, peers: &[PeerHeight], target_height: u64) -> Option<String>;
}
