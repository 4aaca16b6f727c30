//! # Node Configuration
//!
//! Aggregates each subsystem crate's own configuration type plus the
//! node-level concerns (identity, storage location, security, genesis)
//! that only the composition root needs to know about.
//!
//! ## Security Requirements
//!
//! - `hmac_secret` MUST NOT be the default zero value in production.

use std::path::PathBuf;

use qc_consensus::ConsensusConfig;
use qc_mempool::MempoolConfig;
use qc_peer_registry::RegistryConfig;
use qc_resilience::BreakerConfig;

use crate::genesis::GenesisConfig;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub consensus: ConsensusConfig,
    pub mempool: MempoolConfig,
    pub resilience: BreakerConfig,
    pub peer_registry: RegistryConfig,
    pub event_sync: EventSyncConfig,
    pub genesis: GenesisConfig,
}

impl NodeConfig {
    /// Validates configuration for production readiness.
    ///
    /// # Panics
    ///
    /// Panics if the HMAC secret is the default zero value.
    pub fn validate_for_production(&self) {
        if self.security.hmac_secret == [0u8; 32] {
            panic!(
                "SECURITY VIOLATION: HMAC secret is default zero value. \
                 Set QC_HMAC_SECRET or provide it in config."
            );
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            identity: IdentityConfig::default(),
            storage: StorageConfig::default(),
            security: SecurityConfig::default(),
            consensus: ConsensusConfig::default(),
            mempool: MempoolConfig::default(),
            resilience: BreakerConfig::default(),
            peer_registry: RegistryConfig::default(),
            event_sync: EventSyncConfig::default(),
            genesis: GenesisConfig::default(),
        }
    }
}

/// This node's identity within the peer set.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Unique node identifier used as `sourceNodeId` on originated events.
    pub node_id: String,
    /// JSON-RPC / health-check listening port.
    pub rpc_port: u16,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            node_id: "local".to_string(),
            rpc_port: 8545,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Data directory backing the file-mirrored key-value store.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Security configuration.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret backing the broadcast signature and any validator
    /// without an ECDSA key. MUST NOT be default in production.
    pub hmac_secret: [u8; 32],
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            hmac_secret: [0u8; 32],
        }
    }
}

/// Event sync configuration owned by the composition root (the queue's
/// durability bound and HMAC secret length differ from a subsystem-local
/// `*Config` struct, so this stays here rather than in `qc-event-sync`).
#[derive(Debug, Clone)]
pub struct EventSyncConfig {
    /// Durable priority queue high-water mark.
    pub queue_high_water_mark: usize,
}

impl Default for EventSyncConfig {
    fn default() -> Self {
        Self {
            queue_high_water_mark: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_subsystem_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.identity.rpc_port, 8545);
        assert_eq!(config.mempool.max_transactions, 5000);
        assert_eq!(config.event_sync.queue_high_water_mark, 10_000);
    }

    #[test]
    #[should_panic(expected = "HMAC secret is default zero value")]
    fn validate_rejects_default_hmac() {
        let config = NodeConfig::default();
        config.validate_for_production();
    }

    #[test]
    fn validate_accepts_nonzero_hmac() {
        let mut config = NodeConfig::default();
        config.security.hmac_secret = [1u8; 32];
        config.validate_for_production();
    }
}
