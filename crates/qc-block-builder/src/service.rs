//! Service orchestration: snapshot → batch → assemble → sign → append →
//! evict → publish, the `pack()` pipeline.

use crate::adapters::{BlockEventPublisher, PRIORITY_HIGH};
use crate::domain::{merkle_root, BuildError};
use crate::ports::{BlockBuilderApi, ChainStorePort, ConsensusPort, MempoolPort, SigningRequest, TimeSource};
use shared_types::{Address, Block};
use std::collections::BTreeMap;

/// Default block builder service.
pub struct BlockBuilderService<M: MempoolPort, C: ConsensusPort, S: ChainStorePort, T: TimeSource, P: BlockEventPublisher> {
    mempool: M,
    consensus: C,
    chain_store: S,
    time_source: T,
    publisher: P,
}

impl<M: MempoolPort, C: ConsensusPort, S: ChainStorePort, T: TimeSource, P: BlockEventPublisher>
    BlockBuilderService<M, C, S, T, P>
{
    pub fn new(mempool: M, consensus: C, chain_store: S, time_source: T, publisher: P) -> Self {
        Self {
            mempool,
            consensus,
            chain_store,
            time_source,
            publisher,
        }
    }
}

impl<M: MempoolPort, C: ConsensusPort, S: ChainStorePort, T: TimeSource, P: BlockEventPublisher> BlockBuilderApi
    for BlockBuilderService<M, C, S, T, P>
{
    fn pack(&mut self, max_tx: usize, local_node: Address) -> Result<Block, BuildError> {
        let height = self.chain_store.latest_height() + 1;
        let parent_hash = self.chain_store.latest_hash();

        let leader = self
            .consensus
            .select_leader(parent_hash, height)
            .map_err(|_| BuildError::NotLeader)?;
        if leader != local_node {
            return Err(BuildError::NotLeader);
        }

        let batch = self.mempool.get_batch(max_tx);
        if batch.is_empty() {
            return Err(BuildError::EmptyMempool);
        }

        let leaves: Vec<shared_types::Hash> = batch.iter().map(|tx| tx.hash).collect();
        let root = merkle_root(&leaves);
        let timestamp = self.time_source.now();
        let transactions_count = batch.len() as u32;
        let content_hash = crate::domain::block_hash(height, parent_hash, timestamp, root, leader, transactions_count);

        let signature = self
            .consensus
            .sign_block(&SigningRequest {
                hash: content_hash,
                index: height,
                timestamp,
                previous_hash: parent_hash,
                merkle_root: root,
                transactions_count,
                node_id: leader,
            })
            .map_err(BuildError::SigningFailed)?;

        let block = Block {
            index: height,
            parent_hash,
            timestamp,
            validator_address: leader,
            signature,
            merkle_root: root,
            transactions_count,
            transactions: batch,
            metadata: BTreeMap::new(),
            hash: content_hash,
        };

        self.chain_store
            .append(block.clone())
            .map_err(BuildError::AppendConflict)?;

        let hashes: Vec<shared_types::Hash> = block.transactions.iter().map(|tx| tx.hash).collect();
        self.mempool.remove(&hashes);

        if let Err(e) = self.publisher.publish_block_created(block.hash, block.index) {
            tracing::warn!(error = %e, priority = PRIORITY_HIGH, "failed to publish block.created");
        }

        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::publisher::RecordingPublisher;
    use crate::ports::outbound::{MockChainStore, MockConsensus, MockMempool, MockTimeSource};
    use shared_types::{Transaction, ZERO_HASH};

    fn tx(nonce: u64) -> Transaction {
        Transaction {
            from: [1u8; 20],
            to: Some([2u8; 20]),
            amount: 10,
            fee: 1,
            nonce,
            gas_limit: None,
            gas_price: None,
            data: vec![],
            signature: [0u8; 65],
            hash: [nonce as u8 + 1; 32],
        }
    }

    fn leader_addr() -> Address {
        [5u8; 20]
    }

    fn service(
        batch: Vec<Transaction>,
    ) -> BlockBuilderService<MockMempool, MockConsensus, MockChainStore, MockTimeSource, RecordingPublisher> {
        BlockBuilderService::new(
            MockMempool { batch, removed: vec![] },
            MockConsensus {
                leader: leader_addr(),
                signature: "ecdsa:deadbeef".to_string(),
            },
            MockChainStore {
                height: 0,
                hash: ZERO_HASH,
                appended: vec![],
                reject: false,
            },
            MockTimeSource(1_000),
            RecordingPublisher::new(),
        )
    }

    #[test]
    fn pack_assembles_signs_appends_and_evicts() {
        let mut svc = service(vec![tx(0), tx(1)]);
        let block = svc.pack(10, leader_addr()).unwrap();
        assert_eq!(block.index, 1);
        assert_eq!(block.transactions_count, 2);
        assert_eq!(svc.chain_store.appended.len(), 1);
        assert_eq!(svc.mempool.removed.len(), 2);
        assert_eq!(svc.publisher.created.lock().unwrap().len(), 1);
    }

    #[test]
    fn pack_fails_when_not_leader() {
        let mut svc = service(vec![tx(0)]);
        let err = svc.pack(10, [6u8; 20]).unwrap_err();
        assert!(matches!(err, BuildError::NotLeader));
    }

    #[test]
    fn pack_fails_on_empty_mempool() {
        let mut svc = service(vec![]);
        let err = svc.pack(10, leader_addr()).unwrap_err();
        assert!(matches!(err, BuildError::EmptyMempool));
    }

    #[test]
    fn pack_surfaces_append_conflict() {
        let mut svc = service(vec![tx(0)]);
        svc.chain_store.reject = true;
        let err = svc.pack(10, leader_addr()).unwrap_err();
        assert!(matches!(err, BuildError::AppendConflict(_)));
    }
}
