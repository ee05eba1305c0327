//! Generated-file set and atomic writer.
//!
//! ## `atomic_write` — 5-step protocol
//!
//! 1. Render content (already done by caller).
//! 2. Read the current file, if any. An unreadable file counts as changed.
//! 3. Compare SHA-256 digests → skip if identical.
//! 4. Write to `<path>.dashgen.tmp`, carrying over the old file's permissions.
//! 5. Rename to final path (atomic on POSIX).
//!
//! A symlinked output is written through: the link stays and its target is
//! replaced.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::digest::sha256_hex;
use crate::error::{write_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped — on-disk content already matches.
    Unchanged { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::Unchanged { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// WriteDiffer
// ---------------------------------------------------------------------------

/// Desired content keyed by output path.
///
/// Iteration is sorted by path so writes and reports are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteDiffer {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl WriteDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the desired content for `path`, replacing any previous value.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[u8])> {
        self.files.iter().map(|(p, c)| (p.as_path(), c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Persist every file, replacing existing content in full.
    ///
    /// Stops at the first failure; files already written stay written.
    pub fn write(&self) -> Result<Vec<WriteResult>, SyncError> {
        let mut results = Vec::with_capacity(self.files.len());
        for (path, content) in &self.files {
            results.push(atomic_write(path, content)?);
        }
        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically write a single file unless it already holds `content`.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> Result<WriteResult, SyncError> {
    let target = write_target(path);
    let tmp = tmp_path(&target);
    atomic_write_with_tmp(path, &target, content, &tmp)
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.dashgen.tmp", path.display()))
}

/// The file that actually receives the bytes for `path`.
fn write_target(path: &Path) -> PathBuf {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let resolved = std::fs::canonicalize(path).or_else(|_| {
                // Dangling link: create the file it names.
                std::fs::read_link(path).map(|link| match path.parent() {
                    Some(parent) => parent.join(link),
                    None => link,
                })
            });
            match resolved {
                Ok(target) => {
                    tracing::debug!("{} links to {}", path.display(), target.display());
                    target
                }
                Err(_) => path.to_path_buf(),
            }
        }
        _ => path.to_path_buf(),
    }
}

/// Errors are reported against `path`, the name the caller asked for.
fn atomic_write_with_tmp(
    path: &Path,
    target: &Path,
    content: &[u8],
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    // Steps 2–3: compare against what is on disk.
    let digest = sha256_hex(content);
    if let Ok(existing) = std::fs::read(target) {
        if sha256_hex(&existing) == digest {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    // Step 4: ensure parent directory exists, write to .tmp.
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err(path, e))?;
    }
    if let Some(tmp_parent) = tmp.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(tmp_parent).map_err(|e| write_err(path, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| write_err(path, e))?;
    match std::fs::metadata(target) {
        Ok(meta) if meta.is_file() => {
            if let Err(e) = std::fs::set_permissions(tmp, meta.permissions()) {
                let _ = std::fs::remove_file(tmp);
                return Err(write_err(path, e));
            }
        }
        _ => {}
    }

    // Step 5: atomic rename to final path.
    if let Err(e) = std::fs::rename(tmp, target) {
        let _ = std::fs::remove_file(tmp);
        return Err(write_err(path, e));
    }

    tracing::info!("wrote: {} ({} bytes, sha256 {})", path.display(), content.len(), &digest[..12]);
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gen.libsonnet");
        let result = atomic_write(&path, b"hello").unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn second_write_same_content_returns_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.libsonnet");
        atomic_write(&path, b"same content").unwrap();
        let result = atomic_write(&path, b"same content").unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
    }

    #[test]
    fn changed_content_replaces_file_in_full() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.libsonnet");
        atomic_write(&path, b"a much longer first version").unwrap();
        let result = atomic_write(&path, b"v2").unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"v2");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.libsonnet");
        atomic_write(&path, b"data").unwrap();
        assert!(!tmp_path(&path).exists(), ".dashgen.tmp must be cleaned up");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devenv").join("dev-dashboards").join("gen.libsonnet");
        atomic_write(&path, b"content").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn crlf_is_written_verbatim() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bytes.bin");
        atomic_write(&path, b"line1\r\nline2\r\n").unwrap();
        let second = atomic_write(&path, b"line1\nline2\n").unwrap();
        assert!(matches!(second, WriteResult::Written { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"line1\nline2\n");
    }

    #[test]
    fn differ_writes_in_path_order() {
        let tmp = TempDir::new().unwrap();
        let mut wd = WriteDiffer::new();
        wd.insert(tmp.path().join("b.libsonnet"), "b");
        wd.insert(tmp.path().join("a.libsonnet"), "a");
        let results = wd.write().unwrap();
        let names: Vec<_> = results
            .iter()
            .map(|r| r.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.libsonnet", "b.libsonnet"]);
    }

    #[test]
    fn later_failure_keeps_earlier_writes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("blocker"), "a regular file").unwrap();
        let first = tmp.path().join("a.libsonnet");
        let second = tmp.path().join("blocker").join("gen.libsonnet");

        let mut wd = WriteDiffer::new();
        wd.insert(first.clone(), "first");
        wd.insert(second.clone(), "second");

        match wd.write() {
            Err(SyncError::Write { path, .. }) => assert_eq!(path, second),
            other => panic!("expected a write error, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&first).unwrap(), "first");
    }

    #[test]
    fn unreadable_target_is_rewritten_not_reported_as_io() {
        let tmp = TempDir::new().unwrap();
        // Reading a directory fails; so does renaming a file over it.
        let path = tmp.path().join("gen.libsonnet");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let err = atomic_write(&path, b"new content").unwrap_err();
        assert!(matches!(err, SyncError::Write { path: ref p, .. } if *p == path), "{err:?}");
    }

    #[test]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("gen.libsonnet");
        fs::create_dir_all(path.join("occupied")).unwrap();
        fs::write(path.join("occupied").join("keep"), "original").unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_file = tmp_dir.path().join("gen.libsonnet.dashgen.tmp");

        let err = atomic_write_with_tmp(&path, &path, b"new content", &tmp_file).unwrap_err();
        assert!(matches!(err, SyncError::Write { .. }), "{err:?}");
        assert_eq!(
            fs::read_to_string(path.join("occupied").join("keep")).unwrap(),
            "original"
        );
        assert!(!tmp_file.exists(), ".dashgen.tmp should be cleaned up");
    }

    #[test]
    #[cfg(unix)]
    fn symlinked_output_is_written_through() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("shared").join("gen.libsonnet");
        fs::create_dir_all(real.parent().unwrap()).unwrap();
        fs::write(&real, "old").unwrap();
        let link = tmp.path().join("gen.libsonnet");
        symlink(&real, &link).unwrap();

        let result = atomic_write(&link, b"new").unwrap();
        assert_eq!(result, WriteResult::Written { path: link.clone() });
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&real).unwrap(), b"new");
        assert!(!tmp_path(&real).exists());

        let again = atomic_write(&link, b"new").unwrap();
        assert!(matches!(again, WriteResult::Unchanged { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn dangling_symlink_creates_its_target() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("gen.libsonnet");
        symlink("generated/gen.libsonnet", &link).unwrap();

        atomic_write(&link, b"fresh").unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read(tmp.path().join("generated").join("gen.libsonnet")).unwrap(),
            b"fresh"
        );
    }

    #[test]
    #[cfg(unix)]
    fn rewrite_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gen.libsonnet");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        atomic_write(&path, b"new").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
