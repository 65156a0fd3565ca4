//! # vigieau-cli — Command-Line Front End
//!
//! Provides the `vigieau` binary over the zone engine.
//!
//! ## Subcommands
//!
//! - `vigieau locate --lon --lat`: zones containing a point.
//! - `vigieau commune <code>`: zones covering a commune.
//! - `vigieau applicable --commune [--lon --lat]`: the applicable zone.
//! - `vigieau cascade --lon --lat`: zone by descending alert level.
//! - `vigieau levels --commune --profile [--lon --lat] [--types]`: alert levels.
//! - `vigieau departments`: maximum alert level per department.
//! - `vigieau features build|query`: binary feature store.
//! - `vigieau bench`: random point queries over metropolitan France.
//!
//! ## Output and Exit Codes
//!
//! Results are printed to stdout as JSON. A lookup that fails for a domain
//! reason (not found, ambiguous, conflicting data…) prints
//! `{"error", "status", "message"}` and exits with [`LOOKUP_FAILED`].
//! Load and I/O failures are logged and exit with 1.

pub mod bench;
pub mod config;
pub mod features;
pub mod query;

use anyhow::{Context, Result};
use serde::Serialize;
use vigieau_core::{ErrorKind, LookupResult};
use vigieau_resolve::Resolver;

use crate::config::Config;

/// Exit code of a lookup that failed for a domain reason.
pub const LOOKUP_FAILED: u8 = 2;

/// Load the snapshot named by `config`.
pub fn load_resolver(config: &Config) -> Result<Resolver> {
    let paths = config.snapshot_paths();
    Resolver::load(&paths).with_context(|| {
        format!(
            "failed to load snapshot from {}",
            config.data_dir.display()
        )
    })
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}

#[derive(Debug, Serialize)]
struct FailureOutput {
    error: &'static str,
    status: u16,
    message: String,
}

/// Print a lookup outcome and return the process exit code.
pub fn report<T: Serialize>(outcome: LookupResult<T>) -> Result<u8> {
    match outcome {
        Ok(value) => {
            print_json(&value)?;
            Ok(0)
        }
        Err(e) => {
            if e.kind() == ErrorKind::DataInconsistency {
                tracing::error!(error = %e, "lookup failed on inconsistent data");
            } else {
                tracing::info!(kind = e.kind().as_str(), "lookup failed");
            }
            print_json(&FailureOutput {
                error: e.kind().as_str(),
                status: e.http_status(),
                message: e.to_string(),
            })?;
            Ok(LOOKUP_FAILED)
        }
    }
}
