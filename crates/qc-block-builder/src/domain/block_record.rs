//! Merkle root over a transaction batch, and the block-content digest.

use shared_types::{Hash, ZERO_HASH};

/// Computes the Merkle root over `leaves` (already-hashed transactions, in
/// block order). An empty batch roots to `ZERO_HASH`. An odd level
/// duplicates its last node before pairing, matching Bitcoin-style trees.
#[must_use]
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return ZERO_HASH;
    }
    let mut level: Vec<Hash> = leaves.to_vec();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            level.push(*level.last().expect("checked non-empty above"));
        }
        level = level
            .chunks(2)
            .map(|pair| qc_crypto::digest2(&pair[0], &pair[1]))
            .collect();
    }
    level[0]
}

/// Block content digest: `digest(index || parent_hash || timestamp ||
/// merkle_root || validator_address || transactions_count)`, computed once
/// the leader and transaction set are both known but before signing.
#[must_use]
pub fn block_hash(
    index: u64,
    parent_hash: Hash,
    timestamp: u64,
    merkle_root: Hash,
    validator_address: shared_types::Address,
    transactions_count: u32,
) -> Hash {
    let mut bytes = Vec::with_capacity(32 + 8 + 8 + 32 + 20 + 4);
    bytes.extend_from_slice(&index.to_be_bytes());
    bytes.extend_from_slice(&parent_hash);
    bytes.extend_from_slice(&timestamp.to_be_bytes());
    bytes.extend_from_slice(&merkle_root);
    bytes.extend_from_slice(&validator_address);
    bytes.extend_from_slice(&transactions_count.to_be_bytes());
    qc_crypto::digest(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_roots_to_zero_hash() {
        assert_eq!(merkle_root(&[]), ZERO_HASH);
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let leaf = [7u8; 32];
        assert_eq!(merkle_root(&[leaf]), leaf);
    }

    #[test]
    fn odd_count_duplicates_last_leaf() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let c = [3u8; 32];
        let root_odd = merkle_root(&[a, b, c]);
        let root_padded = merkle_root(&[a, b, c, c]);
        assert_eq!(root_odd, root_padded);
    }

    #[test]
    fn order_matters() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_ne!(merkle_root(&[a, b]), merkle_root(&[b, a]));
    }
}
