//! Peer registry error types.

use thiserror::Error;

/// Peer registry error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No peer registered under this node id.
    #[error("peer {0} not found")]
    NotFound(String),
}
