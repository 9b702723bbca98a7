//! Build-driver configuration: which roots to index, which filters to
//! apply, and whether to consult the loader cache.
//!
//! A driver describes its classpath in TOML:
//!
//! ```toml
//! [[classpath]]
//! path = "libs/acme.jar"
//! kind = "library"
//! filter = "+com/acme/api/*;-**/*"
//!
//! [[source]]
//! path = "src/main"
//!
//! [cache]
//! enabled = true
//! key = "workspace-default"
//!
//! [compiler]
//! source_ext = "java"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use javelin_schema::{DEFAULT_SOURCE_EXT, Root, RootKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::LoaderCache;
use crate::classpath::{ClasspathLoader, CompoundLoader, FilteringLoader, LeafLoader};
use crate::error::EngineError;

/// One binary root on the classpath, with an optional access filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClasspathEntry {
    /// Directory or archive path.
    pub path: PathBuf,
    /// Provenance tag for artifacts resolved from this entry.
    #[serde(default)]
    pub kind: RootKind,
    /// Filter expression in the `+glob;-glob` grammar, if access to this
    /// entry is restricted.
    pub filter: Option<String>,
}

/// One source root (directories only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Directory path.
    pub path: PathBuf,
}

/// Loader-cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Whether constructed loader trees are memoized. Off by default; when
    /// off, [`EngineConfig::assemble`] never touches the injected cache.
    #[serde(default)]
    pub enabled: bool,
    /// Opaque cache key; must be stable for semantically identical root
    /// sets. Without a key the cache is bypassed even when enabled.
    pub key: Option<String>,
}

/// Compiler-facing settings the engine needs to know about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Source-file extension resolved against source roots.
    #[serde(default = "default_source_ext")]
    pub source_ext: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            source_ext: default_source_ext(),
        }
    }
}

fn default_source_ext() -> String {
    DEFAULT_SOURCE_EXT.to_string()
}

/// Everything a driver supplies to assemble a loader tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Ordered binary roots.
    #[serde(default)]
    pub classpath: Vec<ClasspathEntry>,
    /// Ordered source roots.
    #[serde(default)]
    pub source: Vec<SourceEntry>,
    /// Loader-cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Compiler settings.
    #[serde(default)]
    pub compiler: CompilerConfig,
}

impl EngineConfig {
    /// Load and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    /// conforming to the schema.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Assemble the loader tree this configuration describes: one leaf
    /// loader per classpath entry (wrapped in a filtering loader where the
    /// entry carries a filter), one leaf loader over all source roots, all
    /// merged under a compound loader.
    ///
    /// When caching is enabled and a key is named, the cache is consulted
    /// first and populated on construction; otherwise the injected cache is
    /// never touched.
    ///
    /// # Errors
    ///
    /// Returns configuration errors from loader construction: missing
    /// roots, unreadable archives, malformed filter clauses.
    pub fn assemble(
        &self,
        cache: &mut LoaderCache,
    ) -> Result<Arc<dyn ClasspathLoader>, EngineError> {
        if self.cache.enabled {
            if let Some(key) = self.cache.key.as_deref() {
                if let Some(cached) = cache.get(key) {
                    debug!(key, "reusing cached loader tree");
                    return Ok(cached);
                }
            }
        }

        let mut children: Vec<Arc<dyn ClasspathLoader>> =
            Vec::with_capacity(self.classpath.len() + 1);

        for entry in &self.classpath {
            let root = Root::new(&entry.path, entry.kind);
            let leaf = LeafLoader::new(vec![root], vec![], &self.compiler.source_ext)?;
            let child: Arc<dyn ClasspathLoader> = match entry.filter.as_deref() {
                Some(expression) => Arc::new(FilteringLoader::new(Arc::new(leaf), expression)?),
                None => Arc::new(leaf),
            };
            children.push(child);
        }

        if !self.source.is_empty() {
            let roots = self
                .source
                .iter()
                .map(|entry| Root::project(&entry.path))
                .collect();
            children.push(Arc::new(LeafLoader::new(
                vec![],
                roots,
                &self.compiler.source_ext,
            )?));
        }

        let tree: Arc<dyn ClasspathLoader> = Arc::new(CompoundLoader::new(children));
        if self.cache.enabled {
            if let Some(key) = &self.cache.key {
                cache.put(key.clone(), Arc::clone(&tree));
            }
        }
        Ok(tree)
    }
}
