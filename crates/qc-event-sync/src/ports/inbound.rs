//! Primary driving port: every subsystem emits through `publish`; the
//! local dispatcher drains via `pop_for_dispatch`; the broadcaster pool
//! drains a plan via `broadcast_plan`; the wire handler calls `receive`.

use crate::domain::{Event, EventSyncError, EventType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    Accepted,
    DedupeSkipped,
}

#[derive(Debug, Clone)]
pub struct BroadcastTarget {
    pub peer_id: String,
    pub signature_hex: String,
}

pub trait EventSyncApi: Send + Sync {
    /// Originates a new event locally and enqueues it for dispatch and
    /// broadcast.
    fn publish(&mut self, event_type: EventType, payload: Vec<u8>) -> Result<Event, EventSyncError>;

    /// Pops the next event for the local in-process dispatcher.
    fn pop_for_dispatch(&mut self) -> Option<Event>;

    /// Verifies the signature, dedupes by `(event.id, event.source_node_id)`,
    /// and — if accepted — records the hop, enqueues for local dispatch, and
    /// returns the (mutated) event ready for re-broadcast.
    fn receive(&mut self, event: Event, body: &[u8], signature_hex: &str) -> Result<(Event, ReceiveOutcome), EventSyncError>;

    /// Computes which currently-eligible peers this event should be sent to
    /// and signs the outgoing body for each, recording one `BroadcastTrack`
    /// entry per peer sent to.
    fn broadcast_plan(&mut self, event: &Event, body: &[u8]) -> Vec<BroadcastTarget>;

    /// Feeds back the outcome of a broadcast attempt to the circuit gate.
    fn record_broadcast_result(&mut self, peer_id: &str, success: bool);
}
