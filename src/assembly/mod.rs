//! Assembly requirements and the compatibility rule for runtime components.
//!
//! A package may declare that it needs a named component at or above some
//! `major.minor` version. Whether a host's available component satisfies the
//! declaration is decided by [`is_sem_ver_compatible`].

mod version;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use version::{Version, VersionParseError};

/// Check whether `actual` satisfies the minimum version `minimum`.
///
/// Both inputs are `major.minor` strings. A major bump is always breaking;
/// within one major line any minor at or above the minimum is compatible.
pub fn is_sem_ver_compatible(minimum: &str, actual: &str) -> Result<bool, VersionParseError> {
    let minimum: Version = minimum.parse()?;
    let actual: Version = actual.parse()?;
    Ok(actual.is_compatible_with(&minimum))
}

/// A declared dependency on a named runtime component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyRequirement {
    pub name: String,
    #[serde(rename = "version")]
    pub min_version: Version,
}

impl AssemblyRequirement {
    pub fn new(name: impl Into<String>, min_version: Version) -> Self {
        Self {
            name: name.into(),
            min_version,
        }
    }

    /// Parse the minimum version from a string.
    pub fn parse(name: impl Into<String>, min_version: &str) -> Result<Self, VersionParseError> {
        Ok(Self::new(name, min_version.parse()?))
    }

    pub fn is_satisfied_by(&self, actual: &Version) -> bool {
        actual.is_compatible_with(&self.min_version)
    }
}

impl fmt::Display for AssemblyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} >= {}", self.name, self.min_version)
    }
}

/// Versions of the runtime components a host has available, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyCatalog {
    components: BTreeMap<String, Version>,
}

impl AssemblyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, version: Version) {
        self.components.insert(name.into(), version);
    }

    pub fn get(&self, name: &str) -> Option<&Version> {
        self.components.get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Build a catalog from `Name=major.minor` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (name, version) = pair
                .split_once('=')
                .with_context(|| format!("Invalid component '{}'. Expected 'Name=major.minor'.", pair))?;
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Invalid component '{}': name is empty", pair);
            }
            let version = version
                .parse::<Version>()
                .with_context(|| format!("Invalid version for component '{}'", name))?;
            catalog.insert(name, version);
        }
        Ok(catalog)
    }
}

/// Why a requirement was not met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementFailure {
    Missing {
        name: String,
        required: Version,
    },
    Incompatible {
        name: String,
        required: Version,
        actual: Version,
    },
}

impl fmt::Display for RequirementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementFailure::Missing { name, required } => {
                write!(f, "{} {} is required but not available", name, required)
            }
            RequirementFailure::Incompatible {
                name,
                required,
                actual,
            } => write!(
                f,
                "{} {} is required but {} is not compatible",
                name, required, actual
            ),
        }
    }
}

/// Check each requirement against `catalog`, returning one failure per
/// unmet requirement in declaration order.
pub fn verify_requirements(
    requirements: &[AssemblyRequirement],
    catalog: &AssemblyCatalog,
) -> Vec<RequirementFailure> {
    requirements
        .iter()
        .filter_map(|req| match catalog.get(&req.name) {
            None => Some(RequirementFailure::Missing {
                name: req.name.clone(),
                required: req.min_version,
            }),
            Some(actual) if !req.is_satisfied_by(actual) => {
                Some(RequirementFailure::Incompatible {
                    name: req.name.clone(),
                    required: req.min_version,
                    actual: *actual,
                })
            }
            Some(_) => None,
        })
        .collect()
}
