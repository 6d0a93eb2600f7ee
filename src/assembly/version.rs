//! Two-component `major.minor` versions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error raised when a version string is not a strict `major.minor` pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Version string is empty")]
    Empty,

    #[error("Invalid version '{input}': expected 'major.minor', found {count} component(s)")]
    ComponentCount { input: String, count: usize },

    #[error("Invalid version '{input}': component '{component}' is not a non-negative integer")]
    InvalidComponent { input: String, component: String },
}

/// A `major.minor` version.
///
/// Ordering compares `major` first, then `minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether `self`, as an available version, satisfies `minimum`.
    ///
    /// A different major line never satisfies; within the same major line any
    /// minor at or above the minimum does.
    pub fn is_compatible_with(&self, minimum: &Version) -> bool {
        self.major == minimum.major && self.minor >= minimum.minor
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 2 {
            return Err(VersionParseError::ComponentCount {
                input: s.to_string(),
                count: parts.len(),
            });
        }

        let component = |part: &str| -> Result<u32, VersionParseError> {
            // u32::from_str accepts a leading '+', which is not a version digit
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionParseError::InvalidComponent {
                    input: s.to_string(),
                    component: part.to_string(),
                });
            }
            part.parse().map_err(|_| VersionParseError::InvalidComponent {
                input: s.to_string(),
                component: part.to_string(),
            })
        };

        Ok(Version {
            major: component(parts[0])?,
            minor: component(parts[1])?,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}
