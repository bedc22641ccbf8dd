//! Exclusive access to the counter record across processes.
//!
//! Uses `fs2` advisory locks (flock on Unix, LockFileEx on Windows). The lock
//! is released when the guard drops.

use crate::error::{ReplyError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct StoreLock {
    file: Option<File>,
}

impl StoreLock {
    /// A guard for stores that have nothing to lock.
    pub fn unlocked() -> Self {
        Self { file: None }
    }

    /// Block until an exclusive lock on `path` is held. Creates the file if
    /// needed.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(ReplyError::Io)?;
        file.lock_exclusive().map_err(ReplyError::Io)?;
        debug!(path = %path.display(), "acquired store lock");
        Ok(Self { file: Some(file) })
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            // Closing the handle releases the lock as well.
            let _ = FileExt::unlock(&file);
        }
    }
}
