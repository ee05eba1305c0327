//! Domain types shared by every dashgen stage.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A leaf resource as reported by the walker, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Literal leaf name as listed by the tree.
    pub raw_name: String,
    /// Tree-relative path, always `/`-separated regardless of host platform.
    pub relative_path: String,
}

/// Display name + path pair bound into the rendered manifest.
///
/// `name` is not unique: two paths may normalise to the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    pub name: String,
    pub path: String,
}

/// Literal leaf or directory names skipped at every depth of a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusions used by the dev-dashboard manifest.
    pub fn dev_dashboards() -> Self {
        DEFAULT_EXCLUDE.iter().copied().collect()
    }

    /// Whether `name` (a bare entry name, never a path) is excluded.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Names excluded from the dev-dashboard manifest by default.
// panel-library.json stays excluded until its import issue is resolved upstream.
pub const DEFAULT_EXCLUDE: &[&str] = &[
    "jsonnetfile.json",
    "jsonnetfile.lock.json",
    "panel-library.json",
];

/// How a run treats the generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Persist generated output, replacing existing files.
    #[default]
    Create,
    /// Compare committed output against fresh output without writing.
    Verify,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Create => f.write_str("create"),
            Mode::Verify => f.write_str("verify"),
        }
    }
}
