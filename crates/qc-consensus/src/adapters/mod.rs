//! Driven adapters: event publishing.

pub mod publisher;

pub use publisher::{ConsensusEventPublisher, NoOpPublisher, PublishError};
