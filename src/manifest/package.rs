use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::assembly::{AssemblyRequirement, Version};
use crate::runtime::Runtime;

/// What a package contributes to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageRole {
    #[default]
    Module,
    Application,
    Binaries,
    Config,
    Data,
}

impl fmt::Display for PackageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageRole::Module => write!(f, "module"),
            PackageRole::Application => write!(f, "application"),
            PackageRole::Binaries => write!(f, "binaries"),
            PackageRole::Config => write!(f, "config"),
            PackageRole::Data => write!(f, "data"),
        }
    }
}

/// Another package this one depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageDependency {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
}

/// Contents of a package folder's manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Falls back to the folder name when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: PackageRole,
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default)]
    pub assemblies: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<PackageDependency>,
    #[serde(default)]
    pub requirements: Vec<AssemblyRequirement>,
}

impl PackageManifest {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime + ?Sized>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read package manifest {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed package manifest {}", path.display()))
    }
}
