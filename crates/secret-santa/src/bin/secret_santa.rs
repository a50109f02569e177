//! Secret Santa command-line entry point.
//!
//! This binary delegates to `secret_santa::cli` for the draw flow, keeping the
//! behaviour testable without spawning a process. Diagnostics go to stderr so
//! the assignment table on stdout stays clean.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use secret_santa::cli::{Options, run};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    init_tracing();

    // Invalid arguments print usage and exit non-zero before any draw.
    let options = Options::parse();

    match run(&options, &mut io::stdout().lock()) {
        Ok(summary) => {
            info!(
                attempts = summary.attempts,
                pairs = summary.batch.len(),
                notified = summary.notified,
                "run complete"
            );
            if options.send() {
                write_stderr(&format!("Notified {} santas", summary.notified));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            write_stderr(&format!("error: {err}"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

fn write_stderr(message: &str) {
    if let Err(err) = writeln!(io::stderr().lock(), "{message}") {
        drop(err);
    }
}
