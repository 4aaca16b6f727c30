//! Ports: inbound `BlockBuilderApi`, outbound mempool/consensus/chain-store/time.

pub mod inbound;
pub mod outbound;

pub use inbound::BlockBuilderApi;
pub use outbound::{ChainStorePort, ConsensusPort, MempoolPort, SigningRequest, SystemTimeSource, TimeSource};
