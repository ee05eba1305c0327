//! Error types for dashgen-sync.

use std::path::PathBuf;

use thiserror::Error;

use dashgen_core::ReadError;
use dashgen_renderer::RenderError;

use crate::verify::VerifyReport;

/// All errors that can end a generate or verify run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The resource tree could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Persisting generated bytes failed. Earlier writes in the run stand.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading committed output failed for a reason other than absence.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Committed output is missing or differs from freshly generated output.
    #[error("{0}")]
    Mismatch(VerifyReport),
}

impl SyncError {
    /// True when the generator worked but the repository is out of date.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, SyncError::Mismatch(_))
    }
}

/// Convenience constructor for [`SyncError::Write`].
pub(crate) fn write_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Write {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
