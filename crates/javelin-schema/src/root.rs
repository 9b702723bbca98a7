//! Classpath roots and the provenance metadata copied onto artifacts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whether a root belongs to the workspace being built or to an external
/// library.
///
/// This tag is provenance metadata only; resolution never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RootKind {
    /// Output or source folder of a workspace project.
    #[default]
    Project,
    /// External library (typically an archive).
    Library,
}

impl std::fmt::Display for RootKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootKind::Project => write!(f, "project"),
            RootKind::Library => write!(f, "library"),
        }
    }
}

/// A filesystem location searched for types: a directory or a single archive
/// file, tagged with its [`RootKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    /// Absolute path of the directory or archive.
    pub path: PathBuf,
    /// Provenance tag carried onto every artifact resolved from this root.
    pub kind: RootKind,
}

impl Root {
    /// Create a root with the given kind.
    pub fn new(path: impl Into<PathBuf>, kind: RootKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Shorthand for a [`RootKind::Project`] root.
    pub fn project(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RootKind::Project)
    }

    /// Shorthand for a [`RootKind::Library`] root.
    pub fn library(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RootKind::Library)
    }

    /// Provenance record naming this root.
    pub fn provenance(&self) -> Provenance {
        Provenance {
            kind: self.kind,
            location: self.path.display().to_string(),
        }
    }

    /// The root path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Where a resolved artifact came from: the kind and rendered location of the
/// root that provided it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Kind of the originating root.
    pub kind: RootKind,
    /// Root location rendered as a string, suitable for diagnostics.
    pub location: String,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} root {}", self.kind, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_carries_kind_and_location() {
        let root = Root::library("/opt/libs/acme.jar");
        let prov = root.provenance();
        assert_eq!(prov.kind, RootKind::Library);
        assert_eq!(prov.location, "/opt/libs/acme.jar");
        assert_eq!(prov.to_string(), "library root /opt/libs/acme.jar");
    }
}
