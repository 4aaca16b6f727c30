//! Filesystem adapter: available disk space, guarding the `DiskFull`
//! invariant before a write is attempted.

use crate::domain::errors::FsError;
use crate::ports::outbound::FileSystemAdapter;
use std::path::{Path, PathBuf};

/// Reports disk usage for the volume backing `path`.
pub struct OsFileSystemAdapter {
    path: PathBuf,
}

impl OsFileSystemAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl FileSystemAdapter for OsFileSystemAdapter {
    fn available_disk_space_percent(&self) -> Result<u8, FsError> {
        let stats = fs2::available_space(&self.path).map_err(|e| FsError::Io { message: e.to_string() })?;
        let total = fs2::total_space(&self.path).map_err(|e| FsError::Io { message: e.to_string() })?;
        if total == 0 {
            return Ok(0);
        }
        Ok(((stats as u128 * 100) / total as u128) as u8)
    }
}
