//! Dependency artifacts: coordinates, scopes, and backing locations.

mod index;

pub use index::{ArtifactIndex, ArtifactInfo};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Maven-style coordinate of a versioned artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Parse a `group:artifact:version` string.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split(':');
        let group_id = parts.next()?;
        let artifact_id = parts.next()?;
        let version = parts.next()?;
        if parts.next().is_some()
            || group_id.is_empty()
            || artifact_id.is_empty()
            || version.is_empty()
        {
            return None;
        }
        Some(Self::new(group_id, artifact_id, version))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// One resolved dependency.
///
/// Identity is the coordinate alone: scope and backing file are attributes,
/// not identity, so the same artifact seen under two scopes compares equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub coordinate: Coordinate,
    /// Build-tool scope tag (`compile`, `test`, `provided`, ...).
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Resolved jar or class directory; absent when resolution failed.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_scope() -> String {
    "compile".to_string()
}

impl Dependency {
    pub fn new(coordinate: Coordinate, scope: impl Into<String>) -> Self {
        Self {
            coordinate,
            scope: scope.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.eq_ignore_ascii_case(scope)
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.coordinate == other.coordinate
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coordinate.hash(state);
    }
}

impl PartialOrd for Dependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.coordinate.cmp(&other.coordinate)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.coordinate.fmt(f)
    }
}
