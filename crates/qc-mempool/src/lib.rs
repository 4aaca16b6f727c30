//! # Mempool
//!
//! Queues, validates, and prioritizes unconfirmed transactions awaiting
//! block inclusion. Implements a Two-Phase Commit protocol so a transaction
//! is never lost between being proposed for a block and that block's
//! storage being confirmed.
//!
//! ## Two-Phase Commit
//!
//! Transactions are never deleted on proposal. Deletion happens only once
//! the chain store confirms the block was persisted.
//!
//! ```text
//! [Pending] ──propose──→ [PendingInclusion] ──remove (confirm)──→ deleted
//!                               │
//!                               └── timeout / reject ──→ [Pending]
//! ```
//!
//! | Stage    | Method                   | Effect                              |
//! |----------|--------------------------|--------------------------------------|
//! | Propose  | `TransactionPool::propose`     | Move to `PendingInclusion`, not deleted |
//! | Confirm  | `TransactionPool::remove`      | Permanently delete entries          |
//! | Rollback | `TransactionPool::rollback`    | Return to `Pending`                 |
//! | Timeout  | `TransactionPool::cleanup_timeouts` | Auto-rollback past the assembly timeout |
//!
//! ## Module structure (hexagonal architecture)
//!
//! ```text
//! adapters/ - event bus publisher/subscriber implementations
//! ports/    - MempoolApi (inbound), NonceProvider/TimeSource (outbound)
//! domain/   - TransactionPool, PooledTransaction, RBF/priority services
//! ipc/      - request/response payloads, the Two-Phase Commit handler, authorization
//! ```

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ipc::*;
pub use service::MempoolService;
