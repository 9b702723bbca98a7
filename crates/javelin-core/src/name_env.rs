//! Name environment: the compiler-facing query surface over a loader tree.

use std::sync::Arc;

use javelin_schema::{AccessRestriction, ClassFile, SourceUnit, TypeName};

use crate::classpath::ClasspathLoader;
use crate::error::EngineError;

/// A resolved type: either a prebuilt binary or a source file the compiler
/// must treat as a compilation unit.
#[derive(Debug, Clone)]
pub enum ResolvedType {
    /// Prebuilt binary descriptor.
    Binary(ClassFile),
    /// Not-yet-compiled source unit.
    Source(SourceUnit),
}

impl ResolvedType {
    /// The access restriction carried by the artifact, if any.
    pub fn restriction(&self) -> Option<&AccessRestriction> {
        match self {
            ResolvedType::Binary(class) => class.restriction(),
            ResolvedType::Source(unit) => unit.restriction(),
        }
    }
}

/// Thin adapter exposing the loader tree's queries to the batch compiler.
///
/// Holds no state and caches nothing: every query re-delegates to the
/// loader tree, which is already O(1) for existence checks.
pub struct NameEnvironment {
    loader: Arc<dyn ClasspathLoader>,
}

impl NameEnvironment {
    /// Wrap the root loader of an assembled tree.
    pub fn new(loader: Arc<dyn ClasspathLoader>) -> Self {
        Self { loader }
    }

    /// Whether the qualified package name is real.
    pub fn is_package(&self, name: &str) -> bool {
        self.loader.has_package(name)
    }

    /// Resolve a qualified type, preferring a binary artifact and falling
    /// back to a source artifact.
    ///
    /// # Errors
    ///
    /// Propagates read errors from the loader tree; absence is `Ok(None)`.
    pub fn find_type(&self, name: &TypeName) -> Result<Option<ResolvedType>, EngineError> {
        if let Some(class) = self.loader.load_class(name)? {
            return Ok(Some(ResolvedType::Binary(class)));
        }
        if let Some(unit) = self.loader.load_source(name)? {
            return Ok(Some(ResolvedType::Source(unit)));
        }
        Ok(None)
    }
}

impl std::fmt::Debug for NameEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameEnvironment").finish_non_exhaustive()
    }
}
