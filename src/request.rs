//! Resolution of parsed CLI arguments into a `LockRequest`.
//!
//! The request is built once at startup and never mutated. All validation
//! happens here, before any file is touched.

use crate::cli::Cli;
use crate::error::{LockTestError, Result};
use crate::locks::{LockFn, LockMode};
use std::path::PathBuf;
use thiserror::Error;

/// Hold duration used when the duration argument is omitted.
pub const DEFAULT_HOLD_SECONDS: u64 = 10;

/// Why a duration argument was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("duration '{0}' is not an integer")]
    NotANumber(String),

    #[error("duration must not be zero")]
    Zero,

    #[error("duration '{0}' is negative")]
    Negative(String),
}

/// A fully validated request to hold a lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    /// File to lock.
    pub path: PathBuf,

    /// Seconds to hold the lock once acquired. Never zero.
    pub hold_seconds: u64,

    /// Whether to take a shared or exclusive lock.
    pub mode: LockMode,

    /// OS primitive used to take and release the lock.
    pub lock_fn: LockFn,

    /// Optional NDJSON file receiving lifecycle events.
    pub events: Option<PathBuf>,
}

impl LockRequest {
    /// Build a request from parsed CLI arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let hold_seconds = resolve_hold_seconds(cli.duration.as_deref(), DEFAULT_HOLD_SECONDS)
            .map_err(|e| LockTestError::Usage(e.to_string()))?;

        // lockf has no shared form
        let mode = if cli.exclusive || !cli.lock_fn.supports_shared() {
            LockMode::Exclusive
        } else {
            LockMode::Shared
        };

        Ok(Self {
            path: cli.filename,
            hold_seconds,
            mode,
            lock_fn: cli.lock_fn,
            events: cli.events,
        })
    }
}

/// Resolve the optional duration argument, falling back to `default`.
pub fn resolve_hold_seconds(
    arg: Option<&str>,
    default: u64,
) -> std::result::Result<u64, DurationError> {
    match arg {
        Some(raw) => parse_hold_seconds(raw),
        None => Ok(default),
    }
}

/// Parse a hold duration in whole seconds.
///
/// Accepts an optional leading `+`. Zero, negative values, and anything
/// that is not a base-10 integer are rejected.
pub fn parse_hold_seconds(raw: &str) -> std::result::Result<u64, DurationError> {
    match raw.parse::<i64>() {
        Ok(0) => Err(DurationError::Zero),
        Ok(n) if n < 0 => Err(DurationError::Negative(raw.to_string())),
        Ok(n) => Ok(n as u64),
        Err(_) => Err(DurationError::NotANumber(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["locktest"];
        argv.extend_from_slice(args);
        Cli::parse_from_args(argv).unwrap()
    }

    #[test]
    fn parse_positive_duration() {
        assert_eq!(parse_hold_seconds("3"), Ok(3));
        assert_eq!(parse_hold_seconds("+7"), Ok(7));
    }

    #[test]
    fn parse_zero_is_rejected() {
        assert_eq!(parse_hold_seconds("0"), Err(DurationError::Zero));
        assert_eq!(parse_hold_seconds("-0"), Err(DurationError::Zero));
        assert_eq!(parse_hold_seconds("000"), Err(DurationError::Zero));
    }

    #[test]
    fn parse_non_numeric_is_rejected() {
        for raw in ["abc", "", "3s", " 3", "1.5", "99999999999999999999"] {
            assert_eq!(
                parse_hold_seconds(raw),
                Err(DurationError::NotANumber(raw.to_string())),
                "expected {:?} to be rejected",
                raw
            );
        }
    }

    #[test]
    fn parse_negative_is_rejected() {
        assert_eq!(
            parse_hold_seconds("-5"),
            Err(DurationError::Negative("-5".to_string()))
        );
    }

    #[test]
    fn missing_duration_uses_default() {
        assert_eq!(resolve_hold_seconds(None, DEFAULT_HOLD_SECONDS), Ok(10));
        assert_eq!(resolve_hold_seconds(None, 42), Ok(42));
    }

    #[test]
    fn request_from_filename_only() {
        let request = LockRequest::from_cli(cli(&["held.lock"])).unwrap();
        assert_eq!(request.path, PathBuf::from("held.lock"));
        assert_eq!(request.hold_seconds, DEFAULT_HOLD_SECONDS);
        assert_eq!(request.mode, LockMode::Shared);
        assert_eq!(request.lock_fn, LockFn::Fcntl);
        assert!(request.events.is_none());
    }

    #[test]
    fn request_with_flock_keeps_shared_mode() {
        let request = LockRequest::from_cli(cli(&["--lock-fn", "flock", "held.lock"])).unwrap();
        assert_eq!(request.lock_fn, LockFn::Flock);
        assert_eq!(request.mode, LockMode::Shared);
    }

    #[test]
    fn request_with_lockf_is_always_exclusive() {
        let request = LockRequest::from_cli(cli(&["--lock-fn", "lockf", "held.lock"])).unwrap();
        assert_eq!(request.lock_fn, LockFn::Lockf);
        assert_eq!(request.mode, LockMode::Exclusive);
    }

    #[test]
    fn request_with_exclusive_flag() {
        let request = LockRequest::from_cli(cli(&["-x", "held.lock", "2"])).unwrap();
        assert_eq!(request.mode, LockMode::Exclusive);
        assert_eq!(request.hold_seconds, 2);
    }

    #[test]
    fn request_with_zero_duration_is_usage_error() {
        let err = LockRequest::from_cli(cli(&["held.lock", "0"])).unwrap_err();
        match err {
            LockTestError::Usage(msg) => assert_eq!(msg, "duration must not be zero"),
            other => panic!("expected usage error, got {:?}", other),
        }
    }

    #[test]
    fn request_with_text_duration_is_usage_error() {
        let err = LockRequest::from_cli(cli(&["held.lock", "abc"])).unwrap_err();
        assert!(matches!(err, LockTestError::Usage(_)));
    }

    #[test]
    fn request_validation_touches_no_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("never-created.lock");
        let path_arg = path.to_str().unwrap();

        let err = LockRequest::from_cli(cli(&[path_arg, "0"])).unwrap_err();
        assert!(matches!(err, LockTestError::Usage(_)));
        assert!(!path.exists());
    }
}
