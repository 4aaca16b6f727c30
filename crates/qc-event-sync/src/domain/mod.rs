//! Domain layer: the event model, priority queue, anti-loop broadcast
//! tracking, and the HMAC body signature.

pub mod broadcast;
pub mod broadcast_track;
pub mod errors;
pub mod event;
pub mod queue;
pub mod security;

pub use broadcast::{decide_broadcast, decide_broadcast_default_hops, BroadcastDecision};
pub use broadcast_track::{BroadcastTrackStore, DEFAULT_TTL_SECS};
pub use errors::EventSyncError;
pub use event::{Event, EventType, DEFAULT_MAX_HOPS, PRIORITY_HIGH, PRIORITY_HIGHEST, PRIORITY_LOWEST, PRIORITY_NORMAL};
pub use queue::EventQueue;
