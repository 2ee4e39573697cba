//! Exit code constants for the locktest CLI.
//!
//! - 0: Success
//! - 1: Usage error (bad argument count, unparseable or zero duration)
//! - 2: The target file could not be opened or created
//! - 3: The lock could not be acquired or released
//! - 4: Status output could not be written

/// Lock acquired, held, and released.
pub const SUCCESS: i32 = 0;

/// Usage error: no file operations were attempted.
pub const USAGE_ERROR: i32 = 1;

/// Opening (or creating) the target file failed.
pub const OPEN_FAILURE: i32 = 2;

/// Acquiring or releasing the advisory lock failed.
pub const LOCK_FAILURE: i32 = 3;

/// Writing a status line to stdout failed.
pub const OUTPUT_FAILURE: i32 = 4;
