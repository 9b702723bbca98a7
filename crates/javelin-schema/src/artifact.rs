//! Resolved artifacts: prebuilt binaries and to-be-compiled sources.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::restriction::AccessRestriction;
use crate::root::Provenance;

/// A resolved binary artifact: the raw type descriptor bytes the compiler's
/// own reader consumes, plus provenance and an optional access restriction.
///
/// Created fresh on every successful resolve call. Never mutated after
/// construction except through [`ClassFile::restrict`], which attaches a
/// restriction at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFile {
    /// Raw bytes of the binary type descriptor.
    pub bytes: Vec<u8>,
    /// Root that provided the artifact.
    pub provenance: Provenance,
    restriction: Option<AccessRestriction>,
}

impl ClassFile {
    /// Create an unrestricted binary artifact.
    pub fn new(bytes: Vec<u8>, provenance: Provenance) -> Self {
        Self {
            bytes,
            provenance,
            restriction: None,
        }
    }

    /// Attach a restriction unless one is already present (first attach wins).
    pub fn restrict(&mut self, restriction: AccessRestriction) {
        if self.restriction.is_none() {
            self.restriction = Some(restriction);
        }
    }

    /// The attached restriction, if any.
    pub fn restriction(&self) -> Option<&AccessRestriction> {
        self.restriction.as_ref()
    }

    /// Whether an access restriction is attached.
    pub fn is_restricted(&self) -> bool {
        self.restriction.is_some()
    }
}

/// A resolved source artifact: decoded text the compiler treats as a
/// compilation unit rather than a prebuilt binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Decoded source text.
    pub text: String,
    /// Encoding label the text was decoded with (currently always `UTF-8`).
    pub encoding: String,
    /// Filesystem path of the source file.
    pub path: PathBuf,
    /// Root that provided the artifact.
    pub provenance: Provenance,
    restriction: Option<AccessRestriction>,
}

impl SourceUnit {
    /// Create an unrestricted source artifact.
    pub fn new(text: String, path: PathBuf, provenance: Provenance) -> Self {
        Self {
            text,
            encoding: "UTF-8".to_string(),
            path,
            provenance,
            restriction: None,
        }
    }

    /// Attach a restriction unless one is already present (first attach wins).
    pub fn restrict(&mut self, restriction: AccessRestriction) {
        if self.restriction.is_none() {
            self.restriction = Some(restriction);
        }
    }

    /// The attached restriction, if any.
    pub fn restriction(&self) -> Option<&AccessRestriction> {
        self.restriction.as_ref()
    }

    /// Whether an access restriction is attached.
    pub fn is_restricted(&self) -> bool {
        self.restriction.is_some()
    }
}
