use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the resolution engine.
///
/// Configuration problems surface at loader construction; read failures
/// surface per resolve call and always carry the root location and the
/// queried type name. Absence of a package or type is never an error --
/// loaders signal it with `Ok(None)`.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A configured root path does not exist on disk.
    #[error("Classpath root does not exist: {0}")]
    RootNotFound(PathBuf),

    /// An archive root could not be opened or indexed at construction time.
    #[error("Unreadable archive root {path}: {source}")]
    UnreadableArchive {
        /// Path of the offending archive.
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A directory root could not be fully scanned at construction time.
    #[error("Failed to scan root {path}: {source}")]
    ScanFailure {
        /// Path of the offending directory.
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A filter expression clause did not conform to the grammar.
    #[error("Invalid filter rule '{clause}': {reason}")]
    InvalidFilterRule {
        /// The clause as written.
        clause: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A matched artifact could not be read from its root.
    #[error("Failed to read {type_name} from {root}: {source}")]
    ReadFailure {
        /// Location of the root that matched.
        root: String,
        /// Qualified name of the queried type.
        type_name: String,
        #[source]
        source: std::io::Error,
    },

    /// A matched archive entry could not be pulled out of its archive.
    #[error("Failed to read archive entry for {type_name} in {root}: {source}")]
    ArchiveRead {
        /// Location of the archive root that matched.
        root: String,
        /// Qualified name of the queried type.
        type_name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// A matched source file was not valid UTF-8.
    #[error("Source for {type_name} in {root} is not valid UTF-8")]
    SourceDecode {
        /// Location of the source root that matched.
        root: String,
        /// Qualified name of the queried type.
        type_name: String,
    },
}
