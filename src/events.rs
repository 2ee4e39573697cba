//! Lock lifecycle event log for locktest.
//!
//! When `--events PATH` is given, each lifecycle step is appended to `PATH`
//! as one JSON object per line (NDJSON). Harnesses can tail the file to see
//! when the lock was waited on, acquired and released, by which process.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `waiting`, `acquired` or `released`
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `pid`: process ID of the lock holder
//! - `path`: the locked file
//! - `mode`: `shared` or `exclusive`
//! - `lock_fn`: `fcntl`, `flock` or `lockf`
//! - `hold_seconds`: the requested hold duration
//!
//! Appending never aborts a run: a failure to write an event is reported as
//! a warning on stderr and the lock sequence carries on.

use crate::locks::{LockFn, LockMode};
use crate::request::LockRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Why an event could not be appended. Never escapes [`EventLog::record`].
#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("failed to serialize {action} event: {source}")]
    Serialize {
        action: LockEventAction,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write event to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Lifecycle steps that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockEventAction {
    /// The non-blocking attempt was contended; about to block.
    Waiting,
    /// The lock is held.
    Acquired,
    /// The lock was released.
    Released,
}

impl std::fmt::Display for LockEventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockEventAction::Waiting => write!(f, "waiting"),
            LockEventAction::Acquired => write!(f, "acquired"),
            LockEventAction::Released => write!(f, "released"),
        }
    }
}

/// A single event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockEvent {
    pub ts: DateTime<Utc>,
    pub action: LockEventAction,
    pub actor: String,
    pub pid: u32,
    pub path: PathBuf,
    pub mode: LockMode,
    pub lock_fn: LockFn,
    pub hold_seconds: u64,
}

impl LockEvent {
    /// Create an event for `request`, stamped with the current time.
    pub fn new(action: LockEventAction, request: &LockRequest) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            pid: std::process::id(),
            path: request.path.clone(),
            mode: request.mode,
            lock_fn: request.lock_fn,
            hold_seconds: request.hold_seconds,
        }
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Destination for lifecycle events. Disabled when no path was given.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Record an event, downgrading any failure to a stderr warning.
    pub fn record(&self, event: &LockEvent) {
        if let Err(e) = self.append(event) {
            eprintln!("Warning: {}", e);
        }
    }

    /// Append an event as one NDJSON line, creating the file if needed.
    pub fn append(&self, event: &LockEvent) -> Result<(), EventLogError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let json_line = event
            .to_ndjson_line()
            .map_err(|e| EventLogError::Serialize {
                action: event.action,
                source: e,
            })?;

        let write_error = |e: io::Error| EventLogError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_error)?;

        writeln!(file, "{}", json_line).map_err(write_error)?;

        Ok(())
    }
}
