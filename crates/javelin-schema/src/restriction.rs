//! Access-restriction metadata attached to resolved artifacts.

use serde::{Deserialize, Serialize};

use crate::root::Provenance;

/// Severity of an access restriction, mirrored into a compiler diagnostic by
/// the consuming driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionSeverity {
    /// Referencing the type is an error.
    Forbidden,
    /// Referencing the type is discouraged but allowed.
    Discouraged,
}

impl std::fmt::Display for RestrictionSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestrictionSeverity::Forbidden => write!(f, "forbidden reference"),
            RestrictionSeverity::Discouraged => write!(f, "discouraged reference"),
        }
    }
}

/// Marks a resolved type as visibility-restricted.
///
/// Produced by filtering loaders when an exclude rule matches; the compiler
/// is expected to turn it into a reference diagnostic. The provenance is
/// copied from the artifact the restriction decorates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRestriction {
    /// The filter clause (as written, sign included) that matched.
    pub pattern: String,
    /// Diagnostic severity.
    pub severity: RestrictionSeverity,
    /// Provenance of the restricted artifact.
    pub origin: Provenance,
}

impl AccessRestriction {
    /// Create a forbidden-reference restriction, the only severity the filter
    /// grammar emits.
    pub fn forbidden(pattern: impl Into<String>, origin: Provenance) -> Self {
        Self {
            pattern: pattern.into(),
            severity: RestrictionSeverity::Forbidden,
            origin,
        }
    }
}
