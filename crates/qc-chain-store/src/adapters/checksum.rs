//! CRC32 checksum adapter for the file mirror's crash-recovery integrity
//! check (`StorageError::DataCorruption`).

use crate::ports::outbound::ChecksumProvider;

#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32ChecksumProvider;

impl ChecksumProvider for Crc32ChecksumProvider {
    fn compute_crc32c(&self, data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }
}
