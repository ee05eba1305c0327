//! Verify mode: compare committed output with freshly generated output.
//!
//! Nothing is ever written. Every path is checked and every mismatch is
//! collected, so one run reports all stale files at once.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::digest::sha256_hex;
use crate::error::{io_err, SyncError};
use crate::writer::WriteDiffer;

/// How a committed file differs from what the generator produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    /// No committed file at the path.
    Missing,
    /// The committed bytes differ.
    Changed {
        expected_sha256: String,
        actual_sha256: String,
        /// Unified diff from committed (`a/`) to generated (`b/`).
        unified_diff: String,
    },
}

/// A single stale output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub path: PathBuf,
    pub kind: MismatchKind,
}

/// Every mismatch found by one verify run, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.mismatches.iter().map(|m| m.path.as_path())
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.mismatches.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match &m.kind {
                MismatchKind::Missing => {
                    write!(f, "{}: file does not exist", m.path.display())?;
                }
                MismatchKind::Changed {
                    expected_sha256,
                    actual_sha256,
                    unified_diff,
                } => {
                    writeln!(
                        f,
                        "{}: content differs (generated sha256 {}, committed sha256 {})",
                        m.path.display(),
                        expected_sha256,
                        actual_sha256
                    )?;
                    write!(f, "{}", unified_diff.trim_end_matches('\n'))?;
                }
            }
        }
        Ok(())
    }
}

impl WriteDiffer {
    /// Compare every desired file against the bytes on disk.
    ///
    /// Absent files are mismatches, not errors. Other read failures abort.
    pub fn diff(&self) -> Result<VerifyReport, SyncError> {
        let mut report = VerifyReport::default();
        for (path, desired) in self.iter() {
            let committed = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    tracing::debug!("missing: {}", path.display());
                    report.mismatches.push(Mismatch {
                        path: path.to_path_buf(),
                        kind: MismatchKind::Missing,
                    });
                    continue;
                }
                Err(err) => return Err(io_err(path, err)),
            };

            if committed == desired {
                tracing::debug!("up to date: {}", path.display());
                continue;
            }

            tracing::debug!("stale: {}", path.display());
            report.mismatches.push(Mismatch {
                path: path.to_path_buf(),
                kind: MismatchKind::Changed {
                    expected_sha256: sha256_hex(desired),
                    actual_sha256: sha256_hex(&committed),
                    unified_diff: unified_diff(path, &committed, desired),
                },
            });
        }
        Ok(report)
    }

    /// Succeed only if every committed file matches byte-for-byte.
    pub fn verify(&self) -> Result<(), SyncError> {
        let report = self.diff()?;
        if report.is_clean() {
            Ok(())
        } else {
            Err(SyncError::Mismatch(report))
        }
    }
}

fn unified_diff(path: &Path, committed: &[u8], generated: &[u8]) -> String {
    let old = String::from_utf8_lossy(committed).into_owned();
    let new = String::from_utf8_lossy(generated).into_owned();
    let old_header = format!("a/{}", path.display());
    let new_header = format!("b/{}", path.display());
    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}
