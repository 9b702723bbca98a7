//! Value types shared between the javelin resolution engine and its drivers.
//!
//! Everything here is immutable once constructed and cheap to clone. The
//! engine crate (`javelin-core`) builds loaders over these types; build
//! drivers consume the artifacts they produce.

pub mod artifact;
pub mod class_name;
pub mod restriction;
pub mod root;

// Re-exports
pub use artifact::{ClassFile, SourceUnit};
pub use class_name::{TypeName, TypeNameError};
pub use restriction::{AccessRestriction, RestrictionSeverity};
pub use root::{Provenance, Root, RootKind};

/// File extension of binary type artifacts, without the leading dot.
pub const CLASS_EXT: &str = "class";

/// Default source-file extension used when a driver does not configure one.
pub const DEFAULT_SOURCE_EXT: &str = "java";
