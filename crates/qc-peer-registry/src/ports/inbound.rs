//! # Inbound Port — PeerRegistryApi
//!
//! Primary driving port for peer lifecycle management: registration,
//! lookup, heartbeat refresh, reputation adjustment, and bans.

use crate::domain::RegistryError;
use shared_types::{Peer, PeerStatus, PublicKey};
use std::collections::BTreeMap;

/// Primary API for the peer registry subsystem.
pub trait PeerRegistryApi: Send + Sync {
    /// Registers a peer on first contact, or returns the existing record
    /// if `host` or `(host, port, public_key)` already identifies one.
    fn register(
        &mut self,
        node_id: String,
        host: String,
        port: u16,
        public_key: PublicKey,
        version: u16,
        metadata: BTreeMap<String, String>,
    ) -> Peer;

    /// Looks up a peer by node id.
    fn get(&self, node_id: &str) -> Option<Peer>;

    /// Lists peers, optionally filtered to a single status.
    fn list(&self, status: Option<PeerStatus>) -> Vec<Peer>;

    /// Refreshes `last_seen`/`version` from a received heartbeat.
    fn update_heartbeat(&mut self, node_id: &str, version: u16) -> Result<(), RegistryError>;

    /// Applies a reputation delta, clamped to `[0, 100]`.
    fn adjust_reputation(&mut self, node_id: &str, delta: i16) -> Result<u8, RegistryError>;

    /// Marks a peer inactive after missed heartbeats.
    fn mark_inactive(&mut self, node_id: &str) -> Result<(), RegistryError>;

    /// Bans a peer, excluding it from fan-out and reconciliation selection.
    fn ban(&mut self, node_id: &str) -> Result<(), RegistryError>;

    /// Lifts a ban, returning the peer to `Active`.
    fn unban(&mut self, node_id: &str) -> Result<(), RegistryError>;
}
