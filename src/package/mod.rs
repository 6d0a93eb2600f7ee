//! Package descriptors and the reader that builds them.
//!
//! A [`PackageInfo`] is what every loader hands back to the host: the
//! package's identity, where it lives, and what it declares.

mod reader;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::assembly::{AssemblyRequirement, Version};
use crate::manifest::{PackageDependency, PackageRole};

pub use reader::{ContentFolderResolver, PackageManifestReader, content_subfolder};

/// Folder roles a package can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    Content,
    Data,
    Config,
}

impl fmt::Display for FolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderKind::Content => write!(f, "content"),
            FolderKind::Data => write!(f, "data"),
            FolderKind::Config => write!(f, "config"),
        }
    }
}

/// An assembly a package ships, found in its `bin` folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AssemblyFile {
    pub name: String,
    pub path: PathBuf,
}

/// Descriptor of one discovered package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub role: PackageRole,
    pub version: Option<Version>,
    pub description: String,
    pub root: PathBuf,
    pub folders: BTreeMap<FolderKind, PathBuf>,
    pub assemblies: Vec<AssemblyFile>,
    pub dependencies: Vec<PackageDependency>,
    pub requirements: Vec<AssemblyRequirement>,
}

impl PackageInfo {
    pub fn folder(&self, kind: FolderKind) -> Option<&Path> {
        self.folders.get(&kind).map(PathBuf::as_path)
    }

    pub fn content_folder(&self) -> Option<&Path> {
        self.folder(FolderKind::Content)
    }
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self
            .version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} {} {} {}",
            self.name,
            self.role,
            version,
            self.root.display()
        )
    }
}
