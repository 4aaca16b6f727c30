//! # Genesis
//!
//! Builds the height-0 block and its seed validator set before the node
//! starts accepting peer blocks or raw transactions.

pub mod builder;

pub use builder::{GenesisBuilder, GenesisConfig, GenesisError};
