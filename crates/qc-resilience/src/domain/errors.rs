//! Resilience subsystem error types.

use thiserror::Error;

/// Resilience subsystem error type.
#[derive(Debug, Error)]
pub enum ResilienceError {
    /// The circuit for this `(peer, operation)` pair is open.
    #[error("circuit open for peer {peer_id} operation {operation}")]
    CircuitOpen {
        /// Peer id.
        peer_id: String,
        /// Guarded operation.
        operation: String,
    },

    /// No peer available to reconcile from (all blacklisted or below the
    /// target height).
    #[error("no eligible peer to reconcile from")]
    NoEligiblePeer,
}
