//! # IPC layer - mempool subsystem
//!
//! Message payloads, the Two-Phase Commit handler, and per-message sender
//! authorization.
//!
//! ## Security architecture
//!
//! Uses the centralized `shared_types::security` module for:
//! - HMAC signature validation
//! - Nonce/replay prevention
//! - Timestamp bounds checking
//!
//! See `security.rs` for per-message sender authorization.

pub mod handler;
pub mod payloads;
pub mod security;

pub use handler::*;
pub use payloads::*;
pub use security::*;
