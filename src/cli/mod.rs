//! CLI argument parsing for locktest.
//!
//! Uses clap derive macros for the argument surface. Any parse failure other
//! than `--help`/`--version` is collapsed into a usage error so the process
//! prints the classic one-line usage and exits 1.

use crate::error::{LockTestError, Result};
use crate::locks::LockFn;
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Program name used when argv[0] is missing or not valid UTF-8.
const FALLBACK_PROGRAM_NAME: &str = "locktest";

/// Hold an advisory lock on a file for a bounded period.
///
/// Opens (creating if needed) the file, takes a shared lock over the whole
/// file, waiting if another process holds a conflicting lock, sleeps for the
/// given duration, then releases the lock.
#[derive(Parser, Debug)]
#[command(name = "locktest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File to lock. Created if it does not exist.
    ///
    /// Names starting with `-` are accepted unless they spell a known flag;
    /// put `--` first to force any name.
    #[arg(allow_hyphen_values = true)]
    pub filename: PathBuf,

    /// Seconds to hold the lock (default 10, must not be zero).
    #[arg(allow_negative_numbers = true)]
    pub duration: Option<String>,

    /// Take an exclusive lock instead of a shared one.
    #[arg(short = 'x', long)]
    pub exclusive: bool,

    /// OS primitive used to take the lock (`lockf` is always exclusive).
    #[arg(long, value_enum, default_value_t = LockFn::Fcntl)]
    pub lock_fn: LockFn,

    /// Append lock lifecycle events as NDJSON to this file.
    #[arg(short, long, value_name = "PATH")]
    pub events: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    ///
    /// Help and version requests print and exit directly; every other
    /// clap error becomes `LockTestError::Usage`.
    pub fn parse_args() -> Result<Self> {
        Self::parse_from_args(std::env::args_os())
    }

    /// Parse an explicit argument list (first item is the program name).
    pub fn parse_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.exit()
            }
            Err(err) => Err(LockTestError::Usage(err.to_string())),
        }
    }
}

/// Resolve the program name shown in the usage line from argv[0].
pub fn program_name(argv0: Option<OsString>) -> String {
    argv0
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_PROGRAM_NAME)
        .to_string()
}

/// The usage line printed to stderr on any usage error.
pub fn usage_line(program: &str) -> String {
    format!("usage: {} filename [duration]", program)
}
