//! IPC translation between wire payloads and the `ConsensusApi` port.

pub mod handler;

pub use handler::{handle_sign_block, handle_verify_block};
