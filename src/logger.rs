//! Log output for the command line.
//!
//! The library logs through the `log` facade; `tracing-subscriber` picks those
//! records up through its `tracing-log` bridge and prints them to stderr.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set and `--verbose` is not given.
const DEFAULT_FILTER: &str = "warn";

/// Filter used for `--verbose`, overriding `RUST_LOG`.
const VERBOSE_FILTER: &str = "warn,novel_book=debug";

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the stderr subscriber. Warnings are always shown; `verbose` adds
/// debug output from this crate.
pub fn init(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {e}"))
}
