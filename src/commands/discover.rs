use anyhow::Result;
use log::debug;
use serde::Serialize;

use super::{DiscoveryOptions, run_loaders};
use crate::diagnostics::{LogEntry, PackageLog};
use crate::package::PackageInfo;
use crate::runtime::Runtime;

/// Everything one discovery pass produced.
#[derive(Debug, Serialize)]
pub struct DiscoverOutput {
    pub packages: Vec<PackageInfo>,
    pub trace: Vec<LogEntry>,
    pub success: bool,
}

/// Run every configured loader and collect packages plus the trace.
#[tracing::instrument(skip(runtime))]
pub fn run_discovery<R: Runtime>(runtime: &R, options: &DiscoveryOptions) -> Result<DiscoverOutput> {
    let log = PackageLog::new();
    let loaders = options.loaders(runtime);
    debug!("Running {} loader(s)", loaders.len());

    let packages = run_loaders(&loaders, &log, options.fail_fast)?;

    Ok(DiscoverOutput {
        success: log.success(),
        trace: log.entries(),
        packages,
    })
}

/// Discover packages and print them, one per line or as JSON.
///
/// Returns whether every loader succeeded.
pub fn discover<R: Runtime>(
    runtime: R,
    options: &DiscoveryOptions,
    json: bool,
    show_trace: bool,
) -> Result<bool> {
    let output = run_discovery(&runtime, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if output.packages.is_empty() {
            println!("No packages found.");
        }
        for package in &output.packages {
            println!("{}", package);
        }
    }

    // Keep stdout clean for JSON consumers
    if show_trace || !output.success {
        for entry in &output.trace {
            eprintln!("{}", entry);
        }
    }

    Ok(output.success)
}
