//! Driven adapters: event publishing.

pub mod publisher;

pub use publisher::{BlockEventPublisher, NoOpPublisher, PublishError, PRIORITY_HIGH};
