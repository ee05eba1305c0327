//! dashgen core library — resource tree capability, scan stages, config.
//!
//! Public API surface:
//! - [`tree`] — [`ResourceTree`] plus on-disk and in-memory trees
//! - [`scan`] — walker, normalizer, sorter
//! - [`config`] — [`GenConfig`] loaded from `dashgen.yaml`
//! - [`types`] — entries, exclusion set, run mode
//! - [`error`] — [`ReadError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod scan;
pub mod tree;
pub mod types;

pub use config::GenConfig;
pub use error::{ConfigError, ReadError};
pub use scan::{scan, sort_entries, walk, Normalizer, ScanOptions};
pub use tree::{DirTree, MemTree, ResourceTree, TreeEntry};
pub use types::{Entry, ExclusionSet, Mode, NormalizedEntry};
