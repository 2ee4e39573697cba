//! Error types for the locktest CLI.
//!
//! Uses thiserror for derive macros. Each variant maps to an exit code.

use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for locktest.
#[derive(Error, Debug)]
pub enum LockTestError {
    /// Bad arguments. Reported as the usage line, not as an error message.
    #[error("{0}")]
    Usage(String),

    /// The target file could not be opened or created.
    #[error("failed to open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The lock could not be acquired.
    #[error("failed to acquire lock on '{}': {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The lock could not be released.
    #[error("failed to release lock on '{}': {source}", .path.display())]
    Release {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A status line could not be written.
    #[error("failed to write status output: {0}")]
    Output(#[from] io::Error),
}

impl LockTestError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockTestError::Usage(_) => exit_codes::USAGE_ERROR,
            LockTestError::Open { .. } => exit_codes::OPEN_FAILURE,
            LockTestError::Lock { .. } | LockTestError::Release { .. } => exit_codes::LOCK_FAILURE,
            LockTestError::Output(_) => exit_codes::OUTPUT_FAILURE,
        }
    }
}

/// Result type alias for locktest operations.
pub type Result<T> = std::result::Result<T, LockTestError>;
