//! Adapters wiring the eight subsystem crates together: per-subsystem
//! bus-publisher bridges (`bus`) and cross-subsystem port implementations
//! (`ports`).

pub mod bus;
pub mod ports;
