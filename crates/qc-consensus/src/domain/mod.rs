//! Domain layer: the validator registry and the proof-of-stake engine.

pub mod engine;
pub mod errors;
pub mod registry;

pub use engine::{BlockSigningPayload, EngineConfig, EpochState, PoSEngine, SignatureMode};
pub use errors::ConsensusError;
pub use registry::{RegistryConfig, ValidatorRegistry};
