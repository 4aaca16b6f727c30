//! Height → hash index, kept sorted for O(log n) lookup and O(1) tail
//! access; rebuilt from the key-value backend on startup.

use shared_types::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexEntry {
    height: u64,
    hash: Hash,
}

/// In-memory height index mirroring the durable store.
#[derive(Debug, Clone, Default)]
pub struct BlockIndex {
    entries: Vec<IndexEntry>,
}

impl BlockIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry at `height` (`replaceTail` reuses
    /// this to rewrite a suffix).
    pub fn insert(&mut self, height: u64, hash: Hash) {
        match self.entries.binary_search_by_key(&height, |e| e.height) {
            Ok(pos) => self.entries[pos].hash = hash,
            Err(pos) => self.entries.insert(pos, IndexEntry { height, hash }),
        }
    }

    /// Drops every entry at or above `from_height` (used before splicing in
    /// a replacement tail).
    pub fn truncate_from(&mut self, from_height: u64) {
        let cut = self.entries.partition_point(|e| e.height < from_height);
        self.entries.truncate(cut);
    }

    #[must_use]
    pub fn get(&self, height: u64) -> Option<Hash> {
        self.entries
            .binary_search_by_key(&height, |e| e.height)
            .ok()
            .map(|pos| self.entries[pos].hash)
    }

    #[must_use]
    pub fn latest_height(&self) -> Option<u64> {
        self.entries.last().map(|e| e.height)
    }

    #[must_use]
    pub fn latest_hash(&self) -> Option<Hash> {
        self.entries.last().map(|e| e.hash)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_sorted_and_overwrites() {
        let mut idx = BlockIndex::new();
        idx.insert(0, [0u8; 32]);
        idx.insert(2, [2u8; 32]);
        idx.insert(1, [1u8; 32]);
        assert_eq!(idx.get(1), Some([1u8; 32]));
        assert_eq!(idx.latest_height(), Some(2));

        idx.insert(1, [9u8; 32]);
        assert_eq!(idx.get(1), Some([9u8; 32]));
        assert_eq!(idx.latest_height(), Some(2));
    }

    #[test]
    fn truncate_from_drops_tail() {
        let mut idx = BlockIndex::new();
        idx.insert(0, [0u8; 32]);
        idx.insert(1, [1u8; 32]);
        idx.insert(2, [2u8; 32]);
        idx.truncate_from(1);
        assert_eq!(idx.latest_height(), Some(0));
        assert_eq!(idx.get(1), None);
    }
}
