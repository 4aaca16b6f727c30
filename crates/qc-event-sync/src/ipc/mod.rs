pub mod handler;

pub use handler::{handle_incoming_event, parse_event_type, IncomingEventRequest, IngestResponse};
