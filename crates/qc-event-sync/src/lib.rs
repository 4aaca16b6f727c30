//! # Event Sync
//!
//! Event-driven peer synchronization: a durable priority queue feeding a
//! local in-process dispatcher and a bounded-concurrency broadcaster, with
//! anti-loop hop tracking and HMAC-authenticated inter-node delivery.
//!
//! ## Event model
//!
//! Every event carries `{id, type, priority (1=highest..5=lowest), payload,
//! sourceNodeId, hopCount, path}`. The queue pops lowest-priority-value,
//! earliest-created first. A received event is deduped by
//! `(eventId, sourceNodeId)`, HMAC-verified, then locally dispatched and
//! re-broadcast to peers not already in its `path`, up to a hop ceiling.
//!
//! ## Crate layout (hexagonal architecture)
//!
//! - `domain/` — event model, priority queue, broadcast-track dedupe store,
//!   anti-loop decisioning, HMAC signing.
//! - `ports/` — `EventSyncApi` (inbound); `TimeSource`, `CircuitGate`,
//!   `PeerDirectory`, `BroadcastTransport` (outbound, crate-local to avoid
//!   depending on `qc-resilience`/`qc-peer-registry` concretely).
//! - `ipc/` — wire translation for `POST /api/sync/events`.
//! - `service.rs` — `EventSyncService`, wiring the domain pieces together.

pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use domain::{Event, EventSyncError, EventType};
pub use ipc::{handle_incoming_event, IncomingEventRequest, IngestResponse};
pub use ports::inbound::{BroadcastTarget, EventSyncApi, ReceiveOutcome};
pub use ports::outbound::{BroadcastTransport, CircuitGate, PeerDirectory, SystemTimeSource, TimeSource, TransportError};
pub use service::EventSyncService;
