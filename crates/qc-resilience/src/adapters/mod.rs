//! Driven adapters: event publishing.

pub mod publisher;

pub use publisher::{NoOpPublisher, PublishError, ResilienceEventPublisher};
