//! The three loader variants and the capability they share.
//!
//! A leaf loader indexes filesystem roots, a compound loader aggregates
//! child loaders with deterministic precedence, and a filtering loader
//! overlays access restrictions. All three are composed through
//! [`ClasspathLoader`]; composition only, no inheritance.

pub mod compound;
pub mod filter;
pub mod leaf;

pub use compound::CompoundLoader;
pub use filter::FilteringLoader;
pub use leaf::LeafLoader;

use javelin_schema::{ClassFile, SourceUnit, TypeName};

use crate::error::EngineError;

/// The three-query capability every loader variant implements.
///
/// Loaders are immutable once constructed, so all queries take `&self` and
/// are safe to issue from multiple threads. `Ok(None)` means "no such
/// package/type here" and is the normal signal, never an error.
pub trait ClasspathLoader: Send + Sync {
    /// Whether the given dot-separated package name is indexed. O(1).
    fn has_package(&self, name: &str) -> bool;

    /// All package names this loader advertises, in deterministic order.
    ///
    /// Used by aggregating loaders to build their own index; not part of the
    /// compiler-facing query surface.
    fn package_names(&self) -> Vec<String>;

    /// Resolve a type to a binary artifact, or `None` if no root provides it.
    ///
    /// # Errors
    ///
    /// Returns a read error (with root and type-name provenance) when a
    /// matched artifact cannot be read.
    fn load_class(&self, name: &TypeName) -> Result<Option<ClassFile>, EngineError>;

    /// Resolve a type to a source artifact, or `None` if no source root
    /// provides it.
    ///
    /// # Errors
    ///
    /// Returns a read error when a matched source file cannot be read or
    /// decoded.
    fn load_source(&self, name: &TypeName) -> Result<Option<SourceUnit>, EngineError>;
}
