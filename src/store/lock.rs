//! Shared/exclusive locking for the state file.
//!
//! Two implementations satisfy the same contract: [`FileLock`] takes an OS
//! advisory lock on a sibling lock file and is safe across processes;
//! [`ProcessLock`] wraps an in-process reader-writer lock and is only safe
//! when a single process owns the state file. The store composes against the
//! trait, so tests and embedded deployments can pick the cheap one.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use parking_lot::RwLock;

use super::error::StoreError;

/// Held lock. Releases on drop.
pub trait StateGuard {}

/// Shared/exclusive lock over the state file.
pub trait StateLock: Send + Sync + std::fmt::Debug {
    /// Acquires the lock in shared mode. Concurrent shared holders are
    /// allowed; blocks while an exclusive holder exists.
    fn shared(&self) -> Result<Box<dyn StateGuard + '_>, StoreError>;

    /// Acquires the lock in exclusive mode, blocking all other holders.
    fn exclusive(&self) -> Result<Box<dyn StateGuard + '_>, StoreError>;
}

/// Cross-process advisory lock on a dedicated lock file.
///
/// The lock file's content is irrelevant; only its lock state matters.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    /// Creates a lock handle over `path` (created on first acquisition).
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn open(&self) -> Result<File, StoreError> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(StoreError::Lock)
    }
}

struct FileGuard {
    file: File,
}

impl StateGuard for FileGuard {}

impl Drop for FileGuard {
    fn drop(&mut self) {
        // Closing the handle also releases the lock; the explicit unlock just
        // narrows the window.
        let _ = self.file.unlock();
    }
}

impl StateLock for FileLock {
    fn shared(&self) -> Result<Box<dyn StateGuard + '_>, StoreError> {
        let file = self.open()?;
        file.lock_shared().map_err(StoreError::Lock)?;
        Ok(Box::new(FileGuard { file }))
    }

    fn exclusive(&self) -> Result<Box<dyn StateGuard + '_>, StoreError> {
        let file = self.open()?;
        file.lock().map_err(StoreError::Lock)?;
        Ok(Box::new(FileGuard { file }))
    }
}

/// In-process fallback lock. Not safe across processes.
#[derive(Debug, Default)]
pub struct ProcessLock {
    inner: RwLock<()>,
}

impl ProcessLock {
    /// Creates a fresh in-process lock.
    pub fn new() -> Self {
        Self::default()
    }
}

struct ReadGuard<'a>(#[allow(dead_code)] parking_lot::RwLockReadGuard<'a, ()>);
struct WriteGuard<'a>(#[allow(dead_code)] parking_lot::RwLockWriteGuard<'a, ()>);

impl StateGuard for ReadGuard<'_> {}
impl StateGuard for WriteGuard<'_> {}

impl StateLock for ProcessLock {
    fn shared(&self) -> Result<Box<dyn StateGuard + '_>, StoreError> {
        Ok(Box::new(ReadGuard(self.inner.read())))
    }

    fn exclusive(&self) -> Result<Box<dyn StateGuard + '_>, StoreError> {
        Ok(Box::new(WriteGuard(self.inner.write())))
    }
}
