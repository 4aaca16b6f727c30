//! # qc-peer-registry
//!
//! The known-peer set: registration (deduplicated by host or by
//! `(host, port, public_key)`), heartbeat refresh, reputation bookkeeping,
//! and bans. `qc-event-sync` fans out only to `Active` peers it finds
//! here; `qc-resilience` reads peer heights and reputation for health
//! monitoring and reconciliation peer selection.

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use domain::{PeerRegistry, RegistryConfig, RegistryError};
pub use ports::{PeerRegistryApi, SystemTimeSource, TimeSource};
pub use service::PeerRegistryService;
