//! # Shared Bus - Event Bus for Inter-Subsystem Communication
//!
//! An in-process publish/subscribe bus every subsystem crate uses instead
//! of calling one another directly. Each `BlockchainEvent` variant wraps a
//! payload defined in `shared_types::ipc`; subscribers filter by `EventTopic`.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  qc-mempool  │                    │ qc-event-sync│
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Security
//!
//! - **Time-Bounded Nonce Cache:** Prevents replay of inter-node messages
//!   that carry a nonce, independent of `qc-event-sync`'s HMAC broadcast
//!   signatures.
//! - **Dead Letter Queue:** Critical errors (e.g. `StorageCritical`) are
//!   published on the `dlq.critical` topic for operator attention.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod nonce_cache;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BlockchainEvent, EventFilter, EventTopic};
pub use nonce_cache::TimeBoundedNonceCache;
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Current protocol version for event bus messages.
pub const PROTOCOL_VERSION: u16 = 1;

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Dead Letter Queue topic for failed messages.
pub const DLQ_TOPIC: &str = "dlq.critical";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_version() {
        assert_eq!(PROTOCOL_VERSION, 1);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }
}
