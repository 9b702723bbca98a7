//! Fully-qualified type names and the relative paths derived from them.

use serde::{Deserialize, Serialize};

use crate::CLASS_EXT;

/// Errors produced when parsing a qualified type name.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TypeNameError {
    /// The input string was empty.
    #[error("Empty type name")]
    Empty,

    /// The input contained an empty segment (leading, trailing, or doubled dot).
    #[error("Empty segment in type name '{0}'")]
    EmptySegment(String),
}

/// A fully-qualified type name split into package and simple name.
///
/// Parsed once at construction; all derived forms (binary path, source path)
/// are computed from the stored segments. Equality and hashing consider only
/// the qualified name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeName {
    qualified: String,
    package: String,
    simple: String,
}

impl TypeName {
    /// Parse a dot-qualified name such as `com.foo.Bar`.
    ///
    /// A name with no dots has an empty package (the default package).
    ///
    /// # Errors
    ///
    /// Returns [`TypeNameError::Empty`] for an empty input and
    /// [`TypeNameError::EmptySegment`] when any dot-separated segment is
    /// empty.
    pub fn parse(qualified: &str) -> Result<Self, TypeNameError> {
        if qualified.is_empty() {
            return Err(TypeNameError::Empty);
        }
        if qualified.split('.').any(str::is_empty) {
            return Err(TypeNameError::EmptySegment(qualified.to_string()));
        }

        let (package, simple) = match qualified.rfind('.') {
            Some(idx) => (&qualified[..idx], &qualified[idx + 1..]),
            None => ("", qualified),
        };

        Ok(Self {
            qualified: qualified.to_string(),
            package: package.to_string(),
            simple: simple.to_string(),
        })
    }

    /// The full dot-qualified name.
    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    /// The package portion; empty for the default package.
    pub fn package_name(&self) -> &str {
        &self.package
    }

    /// The simple (unqualified) type name.
    pub fn simple_name(&self) -> &str {
        &self.simple
    }

    /// Relative path of the binary artifact, e.g. `com/foo/Bar.class`.
    pub fn binary_path(&self) -> String {
        self.relative_path(CLASS_EXT)
    }

    /// Relative path of the source artifact for the given extension,
    /// e.g. `com/foo/Bar.java`.
    pub fn source_path(&self, ext: &str) -> String {
        self.relative_path(ext)
    }

    /// Simple file name of the source artifact, e.g. `Bar.java`.
    pub fn source_file_name(&self, ext: &str) -> String {
        format!("{}.{ext}", self.simple)
    }

    /// Relative directory of the package, e.g. `com/foo` (empty for the
    /// default package).
    pub fn package_dir(&self) -> String {
        self.package.replace('.', "/")
    }

    fn relative_path(&self, ext: &str) -> String {
        if self.package.is_empty() {
            format!("{}.{ext}", self.simple)
        } else {
            format!("{}/{}.{ext}", self.package_dir(), self.simple)
        }
    }
}

impl PartialEq for TypeName {
    fn eq(&self, other: &Self) -> bool {
        self.qualified == other.qualified
    }
}

impl Eq for TypeName {}

impl std::hash::Hash for TypeName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.qualified.hash(state);
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified)
    }
}

impl std::str::FromStr for TypeName {
    type Err = TypeNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified() {
        let name = TypeName::parse("com.foo.Bar").unwrap();
        assert_eq!(name.qualified(), "com.foo.Bar");
        assert_eq!(name.package_name(), "com.foo");
        assert_eq!(name.simple_name(), "Bar");
    }

    #[test]
    fn test_default_package() {
        let name = TypeName::parse("Main").unwrap();
        assert_eq!(name.package_name(), "");
        assert_eq!(name.simple_name(), "Main");
        assert_eq!(name.binary_path(), "Main.class");
        assert_eq!(name.source_path("java"), "Main.java");
    }

    #[test]
    fn test_derived_paths() {
        let name = TypeName::parse("net.sf.tools.Archive").unwrap();
        assert_eq!(name.binary_path(), "net/sf/tools/Archive.class");
        assert_eq!(name.source_path("py"), "net/sf/tools/Archive.py");
        assert_eq!(name.package_dir(), "net/sf/tools");
        assert_eq!(name.source_file_name("java"), "Archive.java");
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(TypeName::parse(""), Err(TypeNameError::Empty));
        assert!(matches!(
            TypeName::parse(".Bar"),
            Err(TypeNameError::EmptySegment(_))
        ));
        assert!(matches!(
            TypeName::parse("com..Bar"),
            Err(TypeNameError::EmptySegment(_))
        ));
        assert!(matches!(
            TypeName::parse("com.foo."),
            Err(TypeNameError::EmptySegment(_))
        ));
    }

    #[test]
    fn test_equality_by_qualified_name() {
        let a = TypeName::parse("com.foo.Bar").unwrap();
        let b = TypeName::parse("com.foo.Bar").unwrap();
        assert_eq!(a, b);

        let c = TypeName::parse("com.foo.Baz").unwrap();
        assert_ne!(a, c);
    }
}
