//! Advisory file locking for locktest.
//!
//! Three OS primitives are available, selected with [`LockFn`]:
//! - `fcntl`: POSIX record lock via `rustix` (the default)
//! - `flock`: whole-file `flock(2)` lock via `fs4`
//! - `lockf`: `lockf(3)` via `libc`, exclusive only
//!
//! Every lock covers the whole file.
//!
//! # Acquisition
//!
//! A [`LockTarget`] is an opened (possibly freshly created) file that is not
//! locked yet. [`LockTarget::try_lock`] makes a single non-blocking attempt
//! and hands the target back when the lock is contended, so the caller can
//! announce the wait before calling [`LockTarget::lock`], which blocks with
//! no timeout.
//!
//! # RAII Guards
//!
//! A held lock is a [`LockGuard`]. Dropping the guard unlocks the file and
//! closes the handle. If unlocking fails during drop, a warning is printed
//! but the program does not crash. Use [`LockGuard::release`] to unlock with
//! error propagation.
//!
//! POSIX record locks belong to the process, not the handle: two targets in
//! one process never contend through `fcntl` or `lockf`, and closing any
//! handle on the file drops them. Contention through those primitives is
//! only observable between processes.

mod guard;
mod primitive;
mod types;


// Re-export public API
pub use guard::{LockGuard, LockTarget, TryLock};
pub use types::{LockFn, LockMode};
