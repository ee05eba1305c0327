//! Read-only resource tree capability.
//!
//! The walker only needs two queries from storage: "list this directory" and
//! "is this entry a directory". [`ResourceTree`] captures exactly that over
//! logical, `/`-separated paths where `""` is the root.
//!
//! Two implementations ship with the crate:
//! - [`DirTree`] — a directory on disk, filtered the way a bundled asset
//!   directory would be (hidden entries dropped, leaves limited to known
//!   extensions).
//! - [`MemTree`] — an in-memory tree whose listing order is insertion order,
//!   with optional per-directory read failures for tests.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::PathBuf;

/// One listed item of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub is_dir: bool,
}

impl TreeEntry {
    pub fn file(name: impl Into<String>) -> Self {
        TreeEntry { name: name.into(), is_dir: false }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        TreeEntry { name: name.into(), is_dir: true }
    }
}

/// Directory listing over a fixed logical root.
///
/// Listing order is not assumed stable.
pub trait ResourceTree {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<TreeEntry>>;
}

impl<T: ResourceTree + ?Sized> ResourceTree for &T {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<TreeEntry>> {
        (**self).read_dir(dir)
    }
}

/// Join a logical parent directory and a child name with `/`.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

// ---------------------------------------------------------------------------
// DirTree
// ---------------------------------------------------------------------------

/// A resource tree backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirTree {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirTree {
    /// Tree rooted at `root` bundling every non-hidden leaf.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirTree { root: root.into(), extensions: Vec::new() }
    }

    /// Only bundle leaves whose name ends in `.<ext>` for one of `extensions`.
    /// An empty list bundles every leaf.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    fn host_path(&self, dir: &str) -> PathBuf {
        dir.split('/')
            .filter(|seg| !seg.is_empty() && *seg != ".")
            .fold(self.root.clone(), |acc, seg| acc.join(seg))
    }

    fn bundles_leaf(&self, name: &str) -> bool {
        self.extensions.is_empty()
            || self.extensions.iter().any(|ext| {
                name.strip_suffix(ext.as_str())
                    .is_some_and(|stem| stem.ends_with('.'))
            })
    }
}

impl ResourceTree for DirTree {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<TreeEntry>> {
        let host = self.host_path(dir);
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&host)? {
            let entry = entry?;
            // Names are rendered into import paths; a lossy rewrite would point
            // at a file that does not exist.
            let name = entry.file_name().into_string().map_err(|raw| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("entry name {raw:?} is not valid UTF-8"),
                )
            })?;
            // Hidden and underscore-prefixed entries are never bundled.
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }
            let is_dir = entry.file_type()?.is_dir();
            if !is_dir && !self.bundles_leaf(&name) {
                continue;
            }
            out.push(TreeEntry { name, is_dir });
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// MemTree
// ---------------------------------------------------------------------------

/// An in-memory resource tree.
///
/// Directories are created implicitly by [`MemTree::insert`]. Each directory
/// lists its children in the order they were first inserted.
#[derive(Debug, Clone)]
pub struct MemTree {
    dirs: HashMap<String, Vec<TreeEntry>>,
    unreadable: BTreeSet<String>,
}

impl MemTree {
    pub fn new() -> Self {
        let mut dirs = HashMap::new();
        dirs.insert(String::new(), Vec::new());
        MemTree { dirs, unreadable: BTreeSet::new() }
    }

    /// Build a tree from leaf paths, in order.
    pub fn from_files<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = MemTree::new();
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    /// Add a leaf at `path`, creating intermediate directories.
    pub fn insert(&mut self, path: &str) -> &mut Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, parents)) = segments.split_last() else {
            return self;
        };
        let mut dir = String::new();
        for seg in parents {
            self.add_child(&dir, TreeEntry::dir(*seg));
            dir = join(&dir, seg);
            self.dirs.entry(dir.clone()).or_default();
        }
        self.add_child(&dir, TreeEntry::file(*leaf));
        self
    }

    /// Make listing `dir` fail with `PermissionDenied`.
    pub fn deny(&mut self, dir: &str) -> &mut Self {
        self.unreadable.insert(dir.trim_matches('/').to_string());
        self
    }

    fn add_child(&mut self, dir: &str, child: TreeEntry) {
        let children = self.dirs.entry(dir.to_string()).or_default();
        if !children.iter().any(|c| c.name == child.name) {
            children.push(child);
        }
    }
}

impl Default for MemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceTree for MemTree {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<TreeEntry>> {
        let dir = dir.trim_matches('/');
        if self.unreadable.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("directory '{dir}' is not readable"),
            ));
        }
        self.dirs.get(dir).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such directory '{dir}'"))
        })
    }
}
