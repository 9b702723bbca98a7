//! Leaf loader: indexes binary and source roots once, resolves by probing
//! providers in root order.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use javelin_schema::{ClassFile, Root, SourceUnit, TypeName};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::classpath::ClasspathLoader;
use crate::error::EngineError;

/// An indexed binary root: either a directory probed by file existence or an
/// archive probed by entry-name membership.
#[derive(Debug)]
enum BinaryRoot {
    Directory(Root),
    Archive {
        root: Root,
        /// Exact entry names, retained for O(1) membership probes.
        entries: HashSet<String>,
    },
}

impl BinaryRoot {
    fn root(&self) -> &Root {
        match self {
            BinaryRoot::Directory(root) | BinaryRoot::Archive { root, .. } => root,
        }
    }
}

/// Indexes an ordered list of binary roots and an ordered list of source
/// roots into a package index at construction time.
///
/// A package is present in the index iff at least one root contributes it.
/// Directory indexing registers every directory level encountered, even
/// ones containing no compilable files; archive indexing registers each
/// entry's package plus every ancestor package.
#[derive(Debug)]
pub struct LeafLoader {
    binary_roots: Vec<BinaryRoot>,
    source_roots: Vec<Root>,
    /// Package name -> binary-root positions, in root order.
    binary_index: HashMap<String, Vec<usize>>,
    /// Package name -> source-root positions, in root order.
    source_index: HashMap<String, Vec<usize>>,
    source_ext: String,
}

impl LeafLoader {
    /// Index the given roots. Binary roots may be directories or archives;
    /// source roots must be directories (an archive source root is skipped
    /// with a warning, not an error).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RootNotFound`] for a missing root path,
    /// [`EngineError::UnreadableArchive`] for an archive that cannot be
    /// opened or enumerated, and [`EngineError::ScanFailure`] when a
    /// directory walk fails.
    pub fn new(
        binary_roots: Vec<Root>,
        source_roots: Vec<Root>,
        source_ext: &str,
    ) -> Result<Self, EngineError> {
        let mut indexed_binary = Vec::with_capacity(binary_roots.len());
        let mut binary_index: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, root) in binary_roots.into_iter().enumerate() {
            if !root.path.exists() {
                return Err(EngineError::RootNotFound(root.path));
            }

            let indexed = if root.path.is_dir() {
                for package in walk_directory_packages(&root.path)? {
                    register(&mut binary_index, package, position);
                }
                BinaryRoot::Directory(root)
            } else {
                let entries = index_archive(&root.path, &mut binary_index, position)?;
                BinaryRoot::Archive { root, entries }
            };

            debug!(
                root = %indexed.root().path.display(),
                packages = binary_index.len(),
                "indexed binary root"
            );
            indexed_binary.push(indexed);
        }

        let mut indexed_source = Vec::with_capacity(source_roots.len());
        let mut source_index: HashMap<String, Vec<usize>> = HashMap::new();

        for root in source_roots {
            if !root.path.exists() {
                return Err(EngineError::RootNotFound(root.path));
            }
            if !root.path.is_dir() {
                warn!(
                    root = %root.path.display(),
                    "archive source roots are not supported, skipping"
                );
                continue;
            }

            let position = indexed_source.len();
            for package in walk_directory_packages(&root.path)? {
                register(&mut source_index, package, position);
            }
            debug!(root = %root.path.display(), "indexed source root");
            indexed_source.push(root);
        }

        Ok(Self {
            binary_roots: indexed_binary,
            source_roots: indexed_source,
            binary_index,
            source_index,
            source_ext: source_ext.to_string(),
        })
    }

    /// The source-file extension this loader resolves against.
    pub fn source_ext(&self) -> &str {
        &self.source_ext
    }
}

impl ClasspathLoader for LeafLoader {
    fn has_package(&self, name: &str) -> bool {
        self.binary_index.contains_key(name) || self.source_index.contains_key(name)
    }

    fn package_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .binary_index
            .keys()
            .chain(self.source_index.keys())
            .map(String::as_str)
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    fn load_class(&self, name: &TypeName) -> Result<Option<ClassFile>, EngineError> {
        let Some(positions) = self.binary_index.get(name.package_name()) else {
            return Ok(None);
        };

        let relative = name.binary_path();
        for &position in positions {
            match &self.binary_roots[position] {
                BinaryRoot::Directory(root) => {
                    let candidate = root.path.join(&relative);
                    if candidate.is_file() {
                        // First match wins; no further roots are tried.
                        let bytes =
                            fs::read(&candidate).map_err(|source| EngineError::ReadFailure {
                                root: root.path.display().to_string(),
                                type_name: name.qualified().to_string(),
                                source,
                            })?;
                        return Ok(Some(ClassFile::new(bytes, root.provenance())));
                    }
                }
                BinaryRoot::Archive { root, entries } => {
                    if entries.contains(&relative) {
                        let bytes = read_archive_entry(&root.path, &relative, name)?;
                        return Ok(Some(ClassFile::new(bytes, root.provenance())));
                    }
                }
            }
        }

        Ok(None)
    }

    fn load_source(&self, name: &TypeName) -> Result<Option<SourceUnit>, EngineError> {
        let Some(positions) = self.source_index.get(name.package_name()) else {
            return Ok(None);
        };

        let file_name = name.source_file_name(&self.source_ext);
        for &position in positions {
            let root = &self.source_roots[position];
            let package_dir = root.path.join(name.package_dir());

            // Match by listing the package directory and comparing simple
            // file names, so the comparison is exact and case-sensitive even
            // on case-folding filesystems. A missing directory is ordinary
            // absence; any other listing failure is a read error.
            let listing = match fs::read_dir(&package_dir) {
                Ok(listing) => listing,
                Err(source) if source.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(EngineError::ReadFailure {
                        root: root.path.display().to_string(),
                        type_name: name.qualified().to_string(),
                        source,
                    });
                }
            };
            for entry in listing.flatten() {
                if entry.file_name().to_string_lossy() != file_name.as_str() {
                    continue;
                }
                let path = entry.path();
                let bytes = fs::read(&path).map_err(|source| EngineError::ReadFailure {
                    root: root.path.display().to_string(),
                    type_name: name.qualified().to_string(),
                    source,
                })?;
                let text =
                    String::from_utf8(bytes).map_err(|_| EngineError::SourceDecode {
                        root: root.path.display().to_string(),
                        type_name: name.qualified().to_string(),
                    })?;
                return Ok(Some(SourceUnit::new(text, path, root.provenance())));
            }
        }

        Ok(None)
    }
}

fn register(index: &mut HashMap<String, Vec<usize>>, package: String, position: usize) {
    let providers = index.entry(package).or_default();
    if !providers.contains(&position) {
        providers.push(position);
    }
}

/// Every directory level under `root` as a dotted package name, the root
/// itself included as the default package.
fn walk_directory_packages(root: &Path) -> Result<Vec<String>, EngineError> {
    let mut packages = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| EngineError::ScanFailure {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path());
        packages.push(path_to_package(&relative.to_string_lossy()));
    }
    Ok(packages)
}

/// Enumerate an archive's entries, registering each entry's containing
/// package and every ancestor package. Returns the full entry-name set for
/// later membership probes.
fn index_archive(
    path: &Path,
    index: &mut HashMap<String, Vec<usize>>,
    position: usize,
) -> Result<HashSet<String>, EngineError> {
    let file = File::open(path).map_err(|source| EngineError::UnreadableArchive {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    let archive = ZipArchive::new(file).map_err(|source| EngineError::UnreadableArchive {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = HashSet::new();
    for entry_name in archive.file_names() {
        // Directory entries name their own package; file entries strip the
        // last path segment.
        let dir = if let Some(stripped) = entry_name.strip_suffix('/') {
            stripped
        } else {
            match entry_name.rfind('/') {
                Some(idx) => &entry_name[..idx],
                None => "",
            }
        };

        register_with_ancestors(index, dir, position);
        entries.insert(entry_name.to_string());
    }

    Ok(entries)
}

/// Register `a/b/c` as `a`, `a.b`, and `a.b.c`.
fn register_with_ancestors(index: &mut HashMap<String, Vec<usize>>, dir: &str, position: usize) {
    if dir.is_empty() {
        register(index, String::new(), position);
        return;
    }
    let mut package = String::new();
    for segment in dir.split('/') {
        if !package.is_empty() {
            package.push('.');
        }
        package.push_str(segment);
        register(index, package.clone(), position);
    }
}

fn path_to_package(relative: &str) -> String {
    relative
        .replace(std::path::MAIN_SEPARATOR, "/")
        .replace('/', ".")
}

fn read_archive_entry(
    archive_path: &Path,
    entry_name: &str,
    name: &TypeName,
) -> Result<Vec<u8>, EngineError> {
    let root = archive_path.display().to_string();
    let file = File::open(archive_path).map_err(|source| EngineError::ReadFailure {
        root: root.clone(),
        type_name: name.qualified().to_string(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| EngineError::ArchiveRead {
        root: root.clone(),
        type_name: name.qualified().to_string(),
        source,
    })?;
    let mut entry = archive
        .by_name(entry_name)
        .map_err(|source| EngineError::ArchiveRead {
            root: root.clone(),
            type_name: name.qualified().to_string(),
            source,
        })?;
    let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
    entry
        .read_to_end(&mut bytes)
        .map_err(|source| EngineError::ReadFailure {
            root,
            type_name: name.qualified().to_string(),
            source,
        })?;
    Ok(bytes)
}
