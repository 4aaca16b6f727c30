//! # Consensus
//!
//! The validator registry and proof-of-stake engine: stake-weighted
//! validator lifecycle (register/stake/penalize/reward) and deterministic
//! leader selection plus dual ECDSA/HMAC-SHA256 block signing and
//! verification.
//!
//! ```text
//! ValidatorRegistry ──active set──→ PoSEngine ──seed(prevHash, height)──→ leader
//!                                        │
//!                                        └─sign/verify canonical block payload
//! ```
//!
//! ## Module structure (hexagonal architecture)
//!
//! ```text
//! domain/   - ValidatorRegistry, PoSEngine, errors
//! ports/    - ConsensusApi (inbound), TimeSource/SigningKeySource (outbound)
//! adapters/ - validator-status-change event publisher
//! ipc/      - VerifyBlockRequest/Response translation
//! ```

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use adapters::{ConsensusEventPublisher, NoOpPublisher, PublishError};
pub use domain::{
    BlockSigningPayload, ConsensusError, EngineConfig, EpochState, PoSEngine, RegistryConfig,
    SignatureMode, ValidatorRegistry,
};
pub use ports::{ConsensusApi, SigningKeySource, SystemTimeSource, TimeSource};
pub use service::{ConsensusConfig, ConsensusService};
