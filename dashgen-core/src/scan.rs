//! Walk → normalise → sort.
//!
//! Each stage hands its output to the next by value. Only [`walk`] touches
//! the resource tree; the other stages are pure.

use crate::error::ReadError;
use crate::tree::{join, ResourceTree};
use crate::types::{Entry, ExclusionSet, NormalizedEntry};

/// Suffix stripped from raw leaf names by default.
pub const DEFAULT_SUFFIX: &str = ".json";

/// Display-name cap, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 40;

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Recursively list every leaf of `tree`, skipping excluded names at any depth.
///
/// An excluded directory is not descended into. Any listing failure aborts
/// the whole walk; nothing collected so far is returned.
pub fn walk(tree: &dyn ResourceTree, exclusions: &ExclusionSet) -> Result<Vec<Entry>, ReadError> {
    let mut entries = Vec::new();
    walk_dir(tree, exclusions, "", &mut entries)?;
    tracing::debug!("walked resource tree: {} leaves", entries.len());
    Ok(entries)
}

fn walk_dir(
    tree: &dyn ResourceTree,
    exclusions: &ExclusionSet,
    dir: &str,
    out: &mut Vec<Entry>,
) -> Result<(), ReadError> {
    let listed = tree.read_dir(dir).map_err(|e| ReadError::new(dir, e))?;
    for item in listed {
        if exclusions.contains(&item.name) {
            tracing::debug!("excluded: {}", join(dir, &item.name));
            continue;
        }
        let path = join(dir, &item.name);
        if item.is_dir {
            walk_dir(tree, exclusions, &path, out)?;
            continue;
        }
        out.push(Entry {
            raw_name: item.name,
            relative_path: path,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Derives display names from raw leaf names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    pub suffix: String,
    pub max_len: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer {
            suffix: DEFAULT_SUFFIX.to_string(),
            max_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl Normalizer {
    /// `max_len` is raised to 1 if zero.
    pub fn new(suffix: impl Into<String>, max_len: usize) -> Self {
        Normalizer { suffix: suffix.into(), max_len: max_len.max(1) }
    }

    /// Strip the suffix, then cap the result at `max_len` characters.
    ///
    /// Names are not made unique. A raw name consisting only of the suffix is
    /// kept whole, and a cap of zero keeps one character, so a non-empty raw
    /// name never yields an empty name.
    pub fn normalize(&self, entry: Entry) -> NormalizedEntry {
        let stripped = match entry.raw_name.strip_suffix(self.suffix.as_str()) {
            Some(stem) if !stem.is_empty() => stem,
            _ => entry.raw_name.as_str(),
        };
        let name = match stripped.char_indices().nth(self.max_len.max(1)) {
            Some((cut, _)) => stripped[..cut].to_string(),
            None => stripped.to_string(),
        };
        NormalizedEntry {
            name,
            path: entry.relative_path,
        }
    }

    pub fn normalize_all(&self, entries: Vec<Entry>) -> Vec<NormalizedEntry> {
        entries.into_iter().map(|e| self.normalize(e)).collect()
    }
}

// ---------------------------------------------------------------------------
// Sorter
// ---------------------------------------------------------------------------

/// Order entries by `name`, byte-wise; equal names keep their input order.
pub fn sort_entries(mut entries: Vec<NormalizedEntry>) -> Vec<NormalizedEntry> {
    // `sort_by` is stable.
    entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    entries
}

// ---------------------------------------------------------------------------
// Full scan
// ---------------------------------------------------------------------------

/// Everything the scan stages need besides the tree itself.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub exclusions: ExclusionSet,
    pub normalizer: Normalizer,
}

impl ScanOptions {
    /// Dev-dashboard defaults: stock exclusions, `.json` suffix, 40-char names.
    pub fn dev_dashboards() -> Self {
        ScanOptions {
            exclusions: ExclusionSet::dev_dashboards(),
            normalizer: Normalizer::default(),
        }
    }
}

/// Walk, normalise and sort `tree` into the manifest entry list.
pub fn scan(
    tree: &dyn ResourceTree,
    options: &ScanOptions,
) -> Result<Vec<NormalizedEntry>, ReadError> {
    let entries = walk(tree, &options.exclusions)?;
    let normalized = options.normalizer.normalize_all(entries);
    Ok(sort_entries(normalized))
}
