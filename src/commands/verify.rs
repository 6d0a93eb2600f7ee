use anyhow::Result;

use super::DiscoveryOptions;
use super::discover::run_discovery;
use crate::assembly::{AssemblyCatalog, RequirementFailure, verify_requirements};
use crate::package::PackageInfo;
use crate::runtime::Runtime;

/// Requirement check result for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub name: String,
    pub failures: Vec<RequirementFailure>,
}

impl PackageReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Check every package's declared requirements against `catalog`.
pub fn verify_packages(packages: &[PackageInfo], catalog: &AssemblyCatalog) -> Vec<PackageReport> {
    packages
        .iter()
        .map(|package| PackageReport {
            name: package.name.clone(),
            failures: verify_requirements(&package.requirements, catalog),
        })
        .collect()
}

/// Discover packages and verify their requirements against the components
/// given as `Name=major.minor` pairs.
///
/// Returns whether discovery succeeded and every requirement is met.
pub fn verify<R: Runtime>(
    runtime: R,
    options: &DiscoveryOptions,
    available: &[String],
) -> Result<bool> {
    let catalog = AssemblyCatalog::from_pairs(available)?;
    let output = run_discovery(&runtime, options)?;

    if !output.success {
        for entry in &output.trace {
            eprintln!("{}", entry);
        }
    }

    let reports = verify_packages(&output.packages, &catalog);
    if reports.is_empty() {
        println!("No packages found.");
    }
    for report in &reports {
        if report.is_ok() {
            println!("{}: ok", report.name);
        } else {
            for failure in &report.failures {
                println!("{}: {}", report.name, failure);
            }
        }
    }

    Ok(output.success && reports.iter().all(PackageReport::is_ok))
}
