//! OpenAPI Reconcile - Command-line tool for reconciling handler metadata.
//!
//! Reads the decorator and docstring metadata extracted for each handler, merges them
//! into one OpenAPI operation per endpoint, validates the result and writes the
//! assembled document.
//!
//! # Usage
//!
//! ```bash
//! openapi-reconcile [OPTIONS] <INPUT>
//! ```
//!
//! # Examples
//!
//! Merge into an existing document:
//! ```bash
//! openapi-reconcile operations.yaml -d openapi.yaml -o openapi.yaml
//! ```
//!
//! Fail the build on structural errors and keep a JSON report:
//! ```bash
//! openapi-reconcile operations.yaml -f json --report findings.json --fail-on-error
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_reconcile::cli;

fn main() -> Result<()> {
    // Parse first so the verbose flag can pick the log level
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI Reconcile starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Reconciliation completed successfully");

    Ok(())
}
