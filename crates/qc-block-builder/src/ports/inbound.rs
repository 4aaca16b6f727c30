//! # Inbound Port — BlockBuilderApi

use crate::domain::BuildError;
use shared_types::{Address, Block};

/// Primary API for the block builder subsystem.
pub trait BlockBuilderApi: Send + Sync {
    /// `pack(maxTx)`: snapshots height/parent hash, pulls a batch from the
    /// mempool, assembles and signs a block as `local_node` if it is the
    /// selected leader, appends it, and removes the included transactions
    /// from the mempool.
    fn pack(&mut self, max_tx: usize, local_node: Address) -> Result<Block, BuildError>;
}
