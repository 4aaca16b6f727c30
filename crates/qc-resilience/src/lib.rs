//! # qc-resilience
//!
//! Per-peer circuit breaking, adaptive heartbeat cadence, and sync-gap
//! reconciliation for the node's peer-facing operations. The circuit
//! breaker guards `qc-event-sync`/`qc-peer-registry` calls against flaky
//! peers; the health monitor decides when the local chain has fallen
//! behind the network and which peer to reconcile from.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    adaptive_interval_secs, batch_ranges, check_sync_needed, select_reconciliation_peer,
    BreakerConfig, CircuitBreakerRegistry, NetworkConditions, PeerBlacklist, PeerHeight,
    ResilienceError, SyncTrigger, Transition,
};
pub use ports::{PeerStatsSource, ResilienceApi, SystemTimeSource, TimeSource};
pub use service::ResilienceService;
