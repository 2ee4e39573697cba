//! locktest: hold an advisory file lock for a bounded period.
//!
//! This is the main entry point for the `locktest` CLI. It parses arguments,
//! runs the lock/hold/release sequence, and maps errors to exit codes.

mod cli;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod locks;
pub mod request;
pub mod runner;

use cli::Cli;
use error::LockTestError;
use request::LockRequest;
use std::process::ExitCode;

fn main() -> ExitCode {
    let program = cli::program_name(std::env::args_os().next());

    let result = Cli::parse_args()
        .and_then(LockRequest::from_cli)
        .and_then(|request| runner::run(&request));

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            match &err {
                // Usage errors keep the classic one-line usage on stderr
                LockTestError::Usage(_) => eprintln!("{}", cli::usage_line(&program)),
                _ => eprintln!("Error: {}", err),
            }

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
