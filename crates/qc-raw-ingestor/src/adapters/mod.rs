//! # Adapters Layer - Event Bus Integration
//!
//! Publisher adapter for `tx.received` fan-out.

pub mod publisher;

pub use publisher::{IngestEventPublisher, NoOpPublisher, PublishError};
