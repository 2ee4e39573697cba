//! Lock mode and lock primitive definitions.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of advisory lock to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Compatible with other shared locks; excludes exclusive locks.
    #[default]
    Shared,
    /// Excludes every other lock on the file.
    Exclusive,
}

impl LockMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockMode::Shared => "shared",
            LockMode::Exclusive => "exclusive",
        }
    }
}

impl std::fmt::Display for LockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OS primitive used to take the lock.
///
/// On Linux, `flock(2)` locks and POSIX record locks (`fcntl(2)`, `lockf(3)`)
/// are tracked separately and never conflict with each other, so a test
/// must use the same family as the process it contends with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum LockFn {
    /// POSIX record lock over the whole file (`F_SETLK`/`F_SETLKW`).
    #[default]
    Fcntl,
    /// Whole-file `flock(2)` lock.
    Flock,
    /// `lockf(3)` from offset 0 to end of file. Exclusive only.
    Lockf,
}

impl LockFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockFn::Fcntl => "fcntl",
            LockFn::Flock => "flock",
            LockFn::Lockf => "lockf",
        }
    }

    /// Whether the primitive can take a shared lock.
    pub fn supports_shared(&self) -> bool {
        !matches!(self, LockFn::Lockf)
    }
}

impl std::fmt::Display for LockFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
