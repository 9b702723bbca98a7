//! Compound loader: aggregates child loaders into a single package index
//! with deterministic precedence.

use std::collections::HashMap;
use std::sync::Arc;

use javelin_schema::{ClassFile, SourceUnit, TypeName};

use crate::classpath::ClasspathLoader;
use crate::error::EngineError;

/// Merges an ordered list of child loaders behind one package index.
///
/// Resolution queries candidate children in list order. For binary
/// resolution an unrestricted result short-circuits; a restricted result is
/// only returned when no unrestricted definition exists anywhere in the
/// list, so restricted visibility never masks an unrestricted definition
/// found later, but is also never silently dropped when it is the only
/// answer.
pub struct CompoundLoader {
    children: Vec<Arc<dyn ClasspathLoader>>,
    /// Package name -> child positions, input order preserved.
    index: HashMap<String, Vec<usize>>,
}

impl CompoundLoader {
    /// Build the aggregate index over the given children.
    pub fn new(children: Vec<Arc<dyn ClasspathLoader>>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, child) in children.iter().enumerate() {
            for package in child.package_names() {
                let providers = index.entry(package).or_default();
                if !providers.contains(&position) {
                    providers.push(position);
                }
            }
        }
        Self { children, index }
    }

    /// Number of aggregated child loaders.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the aggregate has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl std::fmt::Debug for CompoundLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundLoader")
            .field("children", &self.children.len())
            .field("packages", &self.index.len())
            .finish()
    }
}

impl ClasspathLoader for CompoundLoader {
    fn has_package(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn package_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.index.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    fn load_class(&self, name: &TypeName) -> Result<Option<ClassFile>, EngineError> {
        let Some(positions) = self.index.get(name.package_name()) else {
            return Ok(None);
        };

        let mut restricted_fallback = None;
        for &position in positions {
            match self.children[position].load_class(name)? {
                Some(class) if !class.is_restricted() => return Ok(Some(class)),
                Some(class) => {
                    if restricted_fallback.is_none() {
                        restricted_fallback = Some(class);
                    }
                }
                None => {}
            }
        }
        Ok(restricted_fallback)
    }

    fn load_source(&self, name: &TypeName) -> Result<Option<SourceUnit>, EngineError> {
        let Some(positions) = self.index.get(name.package_name()) else {
            return Ok(None);
        };

        // No restriction preference here: source resolution is a fallback
        // path with no independent visibility model.
        for &position in positions {
            if let Some(unit) = self.children[position].load_source(name)? {
                return Ok(Some(unit));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_schema::{AccessRestriction, Provenance, Root, RootKind};

    /// Fixed-answer loader for exercising aggregation policy without
    /// touching the filesystem.
    struct FixedLoader {
        package: String,
        class: Option<ClassFile>,
        source: Option<SourceUnit>,
    }

    impl FixedLoader {
        fn classes(package: &str, class: ClassFile) -> Self {
            Self {
                package: package.to_string(),
                class: Some(class),
                source: None,
            }
        }
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
                Ok(self.class.clone())
            } else {
                Ok(None)
            }
        }

        fn load_source(&self, name: &TypeName) -> Result<Option<SourceUnit>, EngineError> {
            if name.package_name() == self.package {
                Ok(self.source.clone())
            } else {
                Ok(None)
            }
        }
    }

    fn prov(location: &str) -> Provenance {
        Root::new(location, RootKind::Library).provenance()
    }

    fn unrestricted(location: &str) -> ClassFile {
        ClassFile::new(vec![1], prov(location))
    }

    fn restricted(location: &str) -> ClassFile {
        let mut class = ClassFile::new(vec![2], prov(location));
        class.restrict(AccessRestriction::forbidden("-**/*", prov(location)));
        class
    }

    fn name(qualified: &str) -> TypeName {
        TypeName::parse(qualified).unwrap()
    }

    #[test]
    fn test_unrestricted_result_preferred_over_earlier_restricted() {
        let compound = CompoundLoader::new(vec![
            Arc::new(FixedLoader::classes("com.acme", restricted("/l1"))),
            Arc::new(FixedLoader::classes("com.acme", unrestricted("/l2"))),
        ]);

        let class = compound.load_class(&name("com.acme.T")).unwrap().unwrap();
        assert!(!class.is_restricted());
        assert_eq!(class.provenance.location, "/l2");
    }

    #[test]
    fn test_restricted_fallback_when_only_answer() {
        let compound = CompoundLoader::new(vec![Arc::new(FixedLoader::classes(
            "com.acme",
            restricted("/l1"),
        ))]);

        let class = compound.load_class(&name("com.acme.T")).unwrap().unwrap();
        assert!(class.is_restricted());
    }

    #[test]
    fn test_first_restricted_fallback_is_kept() {
        let compound = CompoundLoader::new(vec![
            Arc::new(FixedLoader::classes("com.acme", restricted("/l1"))),
            Arc::new(FixedLoader::classes("com.acme", restricted("/l2"))),
        ]);

        let class = compound.load_class(&name("com.acme.T")).unwrap().unwrap();
        assert_eq!(class.provenance.location, "/l1");
    }

    #[test]
    fn test_unindexed_package_is_absent() {
        let compound = CompoundLoader::new(vec![Arc::new(FixedLoader::classes(
            "com.acme",
            unrestricted("/l1"),
        ))]);

        assert!(!compound.has_package("org.other"));
        assert!(compound.load_class(&name("org.other.T")).unwrap().is_none());
    }

    #[test]
    fn test_source_resolution_takes_first_answer() {
        let with_source = FixedLoader {
            package: "com.acme".to_string(),
            class: None,
            source: Some(SourceUnit::new(
                "class T {}".into(),
                "/src/T.java".into(),
                prov("/src"),
            )),
        };
        let compound = CompoundLoader::new(vec![
            Arc::new(FixedLoader::classes("com.acme", restricted("/l1"))),
            Arc::new(with_source),
        ]);

        let unit = compound.load_source(&name("com.acme.T")).unwrap().unwrap();
        assert_eq!(unit.text, "class T {}");
    }
}
