//! Domain layer: circuit breaker, adaptive heartbeat, sync reconciliation.

pub mod circuit_breaker;
pub mod errors;
pub mod health_monitor;
pub mod heartbeat;

pub use circuit_breaker::{BreakerConfig, CircuitBreakerRegistry, Transition};
pub use errors::ResilienceError;
pub use health_monitor::{batch_ranges, check_sync_needed, select_reconciliation_peer, PeerBlacklist, PeerHeight, SyncTrigger};
pub use heartbeat::{adaptive_interval_secs, NetworkConditions};
