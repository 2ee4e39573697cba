//! Lock acquisition and the RAII guard that releases it.

use super::primitive;
use super::types::{LockFn, LockMode};
use crate::error::{LockTestError, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// An open file that has not been locked yet.
#[derive(Debug)]
pub struct LockTarget {
    file: File,
    path: PathBuf,
    lock_fn: LockFn,
}

/// Outcome of a single non-blocking lock attempt.
#[derive(Debug)]
pub enum TryLock {
    /// The lock was granted immediately.
    Acquired(LockGuard),
    /// Another holder has a conflicting lock; the target is handed back.
    Contended(LockTarget),
}

impl LockTarget {
    /// Open `path` for read/write, creating it if it does not exist.
    ///
    /// Existing contents are left untouched. `lock_fn` selects the OS
    /// primitive used by every later lock and unlock on this target.
    pub fn open<P: AsRef<Path>>(path: P, lock_fn: LockFn) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| LockTestError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            lock_fn,
        })
    }

    /// Make one non-blocking attempt to take the lock.
    pub fn try_lock(self, mode: LockMode) -> Result<TryLock> {
        let attempt = primitive::try_acquire(self.lock_fn, &self.file, mode);
        match attempt {
            Ok(true) => Ok(TryLock::Acquired(LockGuard::new(self, mode))),
            Ok(false) => Ok(TryLock::Contended(self)),
            Err(e) => Err(LockTestError::Lock {
                path: self.path,
                source: e,
            }),
        }
    }

    /// Take the lock, blocking until it is granted.
    pub fn lock(self, mode: LockMode) -> Result<LockGuard> {
        let result = primitive::acquire(self.lock_fn, &self.file, mode);
        match result {
            Ok(()) => Ok(LockGuard::new(self, mode)),
            Err(e) => Err(LockTestError::Lock {
                path: self.path,
                source: e,
            }),
        }
    }
}

/// RAII guard for a held advisory lock.
///
/// When dropped, the lock is released and the file handle closed.
/// If unlocking fails, a warning is printed but no panic occurs.
#[derive(Debug)]
pub struct LockGuard {
    target: LockTarget,
    pub(super) mode: LockMode,

    /// Whether the lock has been released manually.
    released: bool,
}

impl LockGuard {
    fn new(target: LockTarget, mode: LockMode) -> Self {
        Self {
            target,
            mode,
            released: false,
        }
    }

    /// Manually release the lock.
    ///
    /// The file handle is closed when this returns, whether or not the
    /// unlock succeeded.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        primitive::release(self.target.lock_fn, &self.target.file).map_err(|e| {
            LockTestError::Release {
                path: self.target.path.clone(),
                source: e,
            }
        })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = primitive::release(self.target.lock_fn, &self.target.file)
        {
            eprintln!(
                "Warning: failed to release {} {} lock '{}': {}",
                self.target.lock_fn,
                self.mode,
                self.target.path.display(),
                e
            );
        }
    }
}
