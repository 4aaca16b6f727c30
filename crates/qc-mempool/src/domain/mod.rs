//! # Domain Layer — Mempool
//!
//! Pure business logic for the transaction pool.
//!
//! - `entities`: transaction state machine, `PooledTransaction`, `MempoolConfig`
//! - `pool`: `TransactionPool` with priority queue and Two-Phase Commit
//! - `services`: RBF fee-bump calculation, nonce-sequence validation
//! - `value_objects`: `PricedTransaction`, `MempoolStats`, `ProposeResult`
//! - `errors`: `MempoolError`

pub mod entities;
pub mod errors;
pub mod pool;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use pool::*;
pub use services::*;
pub use value_objects::*;
