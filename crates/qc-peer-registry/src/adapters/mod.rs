//! Driven adapters: event publishing.

pub mod publisher;

pub use publisher::{NoOpPublisher, PeerRegistryEventPublisher, PublishError};
