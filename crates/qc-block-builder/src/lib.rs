//! # Block Builder
//!
//! Assembles blocks from the mempool: snapshot height/parent, pull a
//! batch, compute the Merkle root, ask `qc-consensus` who the leader is
//! and sign as them if it's us, append to the chain, evict the included
//! transactions, and publish `block.created`.
//!
//! ```text
//! ChainStore.latest ──height/parent──→ select_leader ──┐
//!                                                        ▼ (leader == local?)
//! Mempool.getBatch ──txs──→ merkle_root ──→ sign_block ──→ ChainStore.append
//!                                                        │
//!                                                        └─Mempool.remove + block.created
//! ```
//!
//! ## Module structure (hexagonal architecture)
//!
//! ```text
//! domain/   - Merkle root, TxRecord hashing, BuildError
//! ports/    - BlockBuilderApi (inbound), Mempool/Consensus/ChainStore/Time (outbound)
//! adapters/ - block.created event publisher
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{BlockEventPublisher, NoOpPublisher, PublishError, PRIORITY_HIGH};
pub use domain::{block_hash, merkle_root, BuildError};
pub use ports::{BlockBuilderApi, ChainStorePort, ConsensusPort, MempoolPort, SigningRequest, SystemTimeSource, TimeSource};
pub use service::BlockBuilderService;
