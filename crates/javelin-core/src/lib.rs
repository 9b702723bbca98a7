//! javelin-core - classpath/package resolution engine for headless builds
//!
//! Given an ordered set of binary roots (directories or archives) and
//! optional source roots, the engine answers two questions for a batch
//! compiler: "does package P exist" and "resolve type T to a binary or
//! source artifact". Loaders index their roots once at construction and are
//! immutable afterwards, so the compiler can query them repeatedly without
//! re-scanning the filesystem.

pub mod cache;
pub mod classpath;
pub mod config;
mod error;
pub mod name_env;

pub use cache::{CacheStats, LoaderCache};
pub use classpath::{ClasspathLoader, CompoundLoader, FilteringLoader, LeafLoader};
pub use config::EngineConfig;
pub use error::EngineError;
pub use name_env::{NameEnvironment, ResolvedType};
