//! Filtering loader: overlays access restrictions on resolved artifacts
//! based on include/exclude rules compiled from a compact filter grammar.
//!
//! An expression is a semicolon-separated list of clauses, each starting
//! with `+` (include) or `-` (exclude) followed by a path glob, e.g.
//! `+com/foo/*;-**/*`. Compiled patterns are matched against the
//! binary-relative path of the queried type, never the source path.

use std::collections::HashSet;
use std::sync::Arc;

use javelin_schema::{AccessRestriction, ClassFile, Provenance, SourceUnit, TypeName};
use regex::Regex;

use crate::classpath::ClasspathLoader;
use crate::error::EngineError;

/// Placeholder standing in for `**/*` between the two wildcard rewrites.
const RECURSIVE_PLACEHOLDER: char = '\u{1}';

/// A compiled filter clause: the original text (sign included, reported as
/// the rule of any restriction it produces) and the derived pattern.
#[derive(Debug, Clone)]
struct Clause {
    raw: String,
    pattern: Regex,
}

/// Decorates one wrapped loader with access-restriction metadata.
///
/// The filter never hides or fabricates existence: every query delegates to
/// the wrapped loader unconditionally, and only non-absent results are
/// inspected against the rules.
pub struct FilteringLoader {
    inner: Arc<dyn ClasspathLoader>,
    includes: Vec<Clause>,
    excludes: Vec<Clause>,
    /// Packages wholly included by clauses of the exact shape `+<pkg>/*`;
    /// membership short-circuits rule evaluation entirely.
    whole_packages: HashSet<String>,
}

impl FilteringLoader {
    /// Compile the filter expression and wrap the given loader.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFilterRule`] for a clause with no sign,
    /// an empty body, or a body that does not compile to a pattern.
    pub fn new(inner: Arc<dyn ClasspathLoader>, expression: &str) -> Result<Self, EngineError> {
        let mut includes = Vec::new();
        let mut excludes = Vec::new();
        let mut whole_packages = HashSet::new();

        for clause_text in expression.split(';') {
            let (sign, body) = split_clause(clause_text)?;
            let clause = Clause {
                raw: clause_text.to_string(),
                pattern: compile_glob(clause_text, body)?,
            };
            match sign {
                '+' => {
                    if let Some(package) = wholly_included_package(body) {
                        whole_packages.insert(package);
                    }
                    includes.push(clause);
                }
                _ => excludes.push(clause),
            }
        }

        Ok(Self {
            inner,
            includes,
            excludes,
            whole_packages,
        })
    }

    /// Evaluate the rules for a resolved type. `None` means the artifact
    /// passes unchanged; `Some` carries the restriction to attach.
    fn evaluate(&self, name: &TypeName, origin: &Provenance) -> Option<AccessRestriction> {
        if self.whole_packages.contains(name.package_name()) {
            return None;
        }

        let binary_path = name.binary_path();
        for include in &self.includes {
            if include.pattern.is_match(&binary_path) {
                return None;
            }
        }
        for exclude in &self.excludes {
            if exclude.pattern.is_match(&binary_path) {
                return Some(AccessRestriction::forbidden(
                    exclude.raw.clone(),
                    origin.clone(),
                ));
            }
        }
        None
    }
}

impl std::fmt::Debug for FilteringLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteringLoader")
            .field("includes", &self.includes.len())
            .field("excludes", &self.excludes.len())
            .finish()
    }
}

impl ClasspathLoader for FilteringLoader {
    fn has_package(&self, name: &str) -> bool {
        self.inner.has_package(name)
    }

    fn package_names(&self) -> Vec<String> {
        self.inner.package_names()
    }

    fn load_class(&self, name: &TypeName) -> Result<Option<ClassFile>, EngineError> {
        let Some(mut class) = self.inner.load_class(name)? else {
            return Ok(None);
        };
        if let Some(restriction) = self.evaluate(name, &class.provenance) {
            class.restrict(restriction);
        }
        Ok(Some(class))
    }

    fn load_source(&self, name: &TypeName) -> Result<Option<SourceUnit>, EngineError> {
        let Some(mut unit) = self.inner.load_source(name)? else {
            return Ok(None);
        };
        if let Some(restriction) = self.evaluate(name, &unit.provenance) {
            unit.restrict(restriction);
        }
        Ok(Some(unit))
    }
}

/// Split a clause into its sign and glob body.
fn split_clause(clause: &str) -> Result<(char, &str), EngineError> {
    let mut chars = clause.chars();
    let sign = chars.next().ok_or_else(|| EngineError::InvalidFilterRule {
        clause: clause.to_string(),
        reason: "empty clause".to_string(),
    })?;
    if sign != '+' && sign != '-' {
        return Err(EngineError::InvalidFilterRule {
            clause: clause.to_string(),
            reason: "clause must start with '+' or '-'".to_string(),
        });
    }
    let body = chars.as_str();
    if body.is_empty() {
        return Err(EngineError::InvalidFilterRule {
            clause: clause.to_string(),
            reason: "clause has no pattern".to_string(),
        });
    }
    Ok((sign, body))
}

/// Compile one glob body into an anchored regex over binary-relative paths.
///
/// Pipeline: swap the literal run `**/*` for a placeholder, rewrite the
/// remaining `*` into "any run of non-dot characters", expand the
/// placeholder into "anything including dots", then require a literal
/// `.class` suffix.
fn compile_glob(clause: &str, body: &str) -> Result<Regex, EngineError> {
    let replaced = body.replace("**/*", &RECURSIVE_PLACEHOLDER.to_string());

    let mut pattern = String::from("^");
    for ch in replaced.chars() {
        match ch {
            RECURSIVE_PLACEHOLDER => pattern.push_str(".*"),
            '*' => pattern.push_str("[^.]*"),
            ch => pattern.push_str(&regex::escape(&ch.to_string())),
        }
    }
    pattern.push_str(r"\.class$");

    Regex::new(&pattern).map_err(|err| EngineError::InvalidFilterRule {
        clause: clause.to_string(),
        reason: err.to_string(),
    })
}

/// For a clause body of the exact shape `<pkg>/*` with no wildcard in
/// `<pkg>`, return the dotted package name.
fn wholly_included_package(body: &str) -> Option<String> {
    let package = body.strip_suffix("/*")?;
    if package.is_empty() || package.contains('*') {
        return None;
    }
    Some(package.replace('/', "."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_schema::{Root, RootKind};

    struct FixedLoader {
        package: String,
        bytes: Vec<u8>,
    }

    impl ClasspathLoader for FixedLoader {
        fn has_package(&self, name: &str) -> bool {
            self.package == name
        }

        fn package_names(&self) -> Vec<String> {
            vec![self.package.clone()]
        }

        fn load_class(&self, name: &TypeName) -> Result<Option<ClassFile>, EngineError> {
            if name.package_name() == self.package {
                Ok(Some(ClassFile::new(
                    self.bytes.clone(),
                    Root::new("/lib.jar", RootKind::Library).provenance(),
                )))
            } else {
                Ok(None)
            }
        }

        fn load_source(&self, _name: &TypeName) -> Result<Option<SourceUnit>, EngineError> {
            Ok(None)
        }
    }

    fn wrap(package: &str, expression: &str) -> FilteringLoader {
        FilteringLoader::new(
            Arc::new(FixedLoader {
                package: package.to_string(),
                bytes: vec![0],
            }),
            expression,
        )
        .unwrap()
    }

    fn name(qualified: &str) -> TypeName {
        TypeName::parse(qualified).unwrap()
    }

    #[test]
    fn test_included_package_passes_unchanged() {
        let loader = wrap("com.foo", "+com/foo/*;-**/*");
        let class = loader.load_class(&name("com.foo.Bar")).unwrap().unwrap();
        assert!(!class.is_restricted());
    }

    #[test]
    fn test_excluded_type_carries_restriction() {
        let loader = wrap("com.baz", "+com/foo/*;-**/*");
        let class = loader.load_class(&name("com.baz.Qux")).unwrap().unwrap();

        let restriction = class.restriction().unwrap();
        assert_eq!(restriction.pattern, "-**/*");
        assert_eq!(
            restriction.severity,
            javelin_schema::RestrictionSeverity::Forbidden
        );
        // Provenance is copied from the artifact, not invented by the filter.
        assert_eq!(restriction.origin, class.provenance);
    }

    #[test]
    fn test_universal_exclude_matches_every_class_path() {
        let pattern = compile_glob("-**/*", "**/*").unwrap();
        assert!(pattern.is_match("Foo.class"));
        assert!(pattern.is_match("a/b/Foo.class"));
        assert!(pattern.is_match("very/deep/pkg/chain/Type.class"));
        assert!(!pattern.is_match("a/b/Foo.java"));
    }

    #[test]
    fn test_single_star_stays_within_package_segments() {
        let pattern = compile_glob("+com/foo/*", "com/foo/*").unwrap();
        assert!(pattern.is_match("com/foo/Bar.class"));
        assert!(!pattern.is_match("com/foo/Bar.Inner.class"));
        assert!(!pattern.is_match("org/foo/Bar.class"));
    }

    #[test]
    fn test_filter_never_fabricates_existence() {
        let loader = wrap("com.foo", "-**/*");
        assert!(loader.load_class(&name("org.other.T")).unwrap().is_none());
        assert!(loader.has_package("com.foo"));
        assert!(!loader.has_package("org.other"));
    }

    #[test]
    fn test_malformed_clauses_rejected_at_construction() {
        let inner: Arc<dyn ClasspathLoader> = Arc::new(FixedLoader {
            package: "p".to_string(),
            bytes: vec![],
        });

        for expression in ["com/foo/*", "+", "", "+a/*;;-**/*"] {
            let result = FilteringLoader::new(Arc::clone(&inner), expression);
            assert!(
                matches!(result, Err(EngineError::InvalidFilterRule { .. })),
                "expected rejection of {expression:?}"
            );
        }
    }

    #[test]
    fn test_includes_evaluated_before_excludes() {
        // No `+<pkg>/*` clause, so the whole-package fast path stays empty
        // and rule ordering is what decides.
        let loader = wrap("com.foo", "+com/foo/Secret*;-com/foo/*");

        let cleared = loader.load_class(&name("com.foo.SecretKey")).unwrap().unwrap();
        assert!(!cleared.is_restricted());

        let caught = loader.load_class(&name("com.foo.Other")).unwrap().unwrap();
        assert_eq!(caught.restriction().unwrap().pattern, "-com/foo/*");
    }

    #[test]
    fn test_restriction_applies_to_source_results_via_binary_path() {
        struct SourceOnly;
        impl ClasspathLoader for SourceOnly {
            fn has_package(&self, name: &str) -> bool {
                name == "com.baz"
            }
            fn package_names(&self) -> Vec<String> {
                vec!["com.baz".to_string()]
            }
            fn load_class(&self, _: &TypeName) -> Result<Option<ClassFile>, EngineError> {
                Ok(None)
            }
            fn load_source(&self, name: &TypeName) -> Result<Option<SourceUnit>, EngineError> {
                Ok(Some(SourceUnit::new(
                    "class Qux {}".into(),
                    format!("/src/{}", name.source_path("java")).into(),
                    Root::project("/src").provenance(),
                )))
            }
        }

        let loader = FilteringLoader::new(Arc::new(SourceOnly), "-com/baz/*").unwrap();
        let unit = loader.load_source(&name("com.baz.Qux")).unwrap().unwrap();
        assert!(unit.is_restricted());
    }
}
