//! Calls into the OS locking primitives.
//!
//! Every lock covers the whole file: `fcntl` uses offset 0 and length 0
//! (to end of file and beyond), `lockf` seeks to 0 first, and `flock` has
//! no range at all.

use super::types::{LockFn, LockMode};
use fs4::fs_std::FileExt;
use std::fs::File;
use std::io;

/// Make one non-blocking attempt. `Ok(false)` means another holder conflicts.
pub(super) fn try_acquire(lock_fn: LockFn, file: &File, mode: LockMode) -> io::Result<bool> {
    let result = match lock_fn {
        // Fully qualified so std's inherent `File` locking methods don't shadow fs4.
        LockFn::Flock => match mode {
            LockMode::Shared => FileExt::try_lock_shared(file),
            LockMode::Exclusive => FileExt::try_lock_exclusive(file),
        },
        LockFn::Fcntl => posix::fcntl(file, mode, false).map(|()| true),
        LockFn::Lockf => posix::lockf(file, posix::LockfOp::TryLock).map(|()| true),
    };

    match result {
        Err(e) if is_contended(&e) => Ok(false),
        other => other,
    }
}

/// Block until the lock is granted.
pub(super) fn acquire(lock_fn: LockFn, file: &File, mode: LockMode) -> io::Result<()> {
    match lock_fn {
        LockFn::Flock => match mode {
            LockMode::Shared => FileExt::lock_shared(file),
            LockMode::Exclusive => FileExt::lock_exclusive(file),
        },
        LockFn::Fcntl => posix::fcntl(file, mode, true),
        LockFn::Lockf => posix::lockf(file, posix::LockfOp::Lock),
    }
}

pub(super) fn release(lock_fn: LockFn, file: &File) -> io::Result<()> {
    match lock_fn {
        LockFn::Flock => FileExt::unlock(file),
        LockFn::Fcntl => posix::fcntl_unlock(file),
        LockFn::Lockf => posix::lockf(file, posix::LockfOp::Unlock),
    }
}

/// `F_SETLK` and `F_TLOCK` report a conflicting holder as `EAGAIN` or `EACCES`.
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock || posix::is_access_conflict(err)
}

#[cfg(unix)]
mod posix {
    use super::LockMode;
    use rustix::fs::{FlockOperation, fcntl_lock};
    use std::fs::File;
    use std::io::{self, Seek, SeekFrom};
    use std::os::fd::AsRawFd;

    pub(super) enum LockfOp {
        TryLock,
        Lock,
        Unlock,
    }

    pub(super) fn fcntl(file: &File, mode: LockMode, blocking: bool) -> io::Result<()> {
        let operation = match (mode, blocking) {
            (LockMode::Shared, false) => FlockOperation::NonBlockingLockShared,
            (LockMode::Shared, true) => FlockOperation::LockShared,
            (LockMode::Exclusive, false) => FlockOperation::NonBlockingLockExclusive,
            (LockMode::Exclusive, true) => FlockOperation::LockExclusive,
        };
        fcntl_lock(file, operation).map_err(io::Error::from)
    }

    pub(super) fn fcntl_unlock(file: &File) -> io::Result<()> {
        fcntl_lock(file, FlockOperation::Unlock).map_err(io::Error::from)
    }

    pub(super) fn lockf(file: &File, op: LockfOp) -> io::Result<()> {
        // lockf ranges start at the current offset
        let mut handle = file;
        handle.seek(SeekFrom::Start(0))?;

        let cmd = match op {
            LockfOp::TryLock => libc::F_TLOCK,
            LockfOp::Lock => libc::F_LOCK,
            LockfOp::Unlock => libc::F_ULOCK,
        };

        // SAFETY: the descriptor is owned by `file`, which outlives the call
        if unsafe { libc::lockf(file.as_raw_fd(), cmd, 0) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub(super) fn is_access_conflict(err: &io::Error) -> bool {
        err.raw_os_error() == Some(libc::EACCES)
    }
}

#[cfg(not(unix))]
mod posix {
    use super::LockMode;
    use std::fs::File;
    use std::io;

    pub(super) enum LockfOp {
        TryLock,
        Lock,
        Unlock,
    }

    fn unsupported() -> io::Error {
        io::Error::new(
            io::ErrorKind::Unsupported,
            "POSIX record locks are only available on Unix; use --lock-fn flock",
        )
    }

    pub(super) fn fcntl(_file: &File, _mode: LockMode, _blocking: bool) -> io::Result<()> {
        Err(unsupported())
    }

    pub(super) fn fcntl_unlock(_file: &File) -> io::Result<()> {
        Err(unsupported())
    }

    pub(super) fn lockf(_file: &File, _op: LockfOp) -> io::Result<()> {
        Err(unsupported())
    }

    pub(super) fn is_access_conflict(_err: &io::Error) -> bool {
        false
    }
}
