//! Shared generate-or-verify entrypoint used by the CLI.
//!
//! `{Idle} → generate → {Writing | Verifying} → {Success | Failure}`.
//! There are no retries; any error ends the run.

use std::path::PathBuf;

use dashgen_core::{scan, GenConfig, Mode, ResourceTree, ScanOptions};
use dashgen_renderer::Renderer;

use crate::{SyncError, WriteDiffer, WriteResult};

/// Everything a run needs besides the tree and the mode.
#[derive(Debug, Clone)]
pub struct GenOptions {
    pub scan: ScanOptions,
    pub template: String,
    pub template_dir: Option<PathBuf>,
    pub output: PathBuf,
}

impl GenOptions {
    pub fn from_config(config: &GenConfig) -> Self {
        GenOptions {
            scan: config.scan_options(),
            template: config.template.clone(),
            template_dir: config.template_dir.clone(),
            output: config.output.clone(),
        }
    }
}

impl Default for GenOptions {
    fn default() -> Self {
        Self::from_config(&GenConfig::default())
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Create mode: per-file write results.
    Written(Vec<WriteResult>),
    /// Verify mode: this many files matched.
    Verified { files: usize },
}

/// Scan `tree` and render the manifest, keyed by its output path.
///
/// Touches nothing but the tree.
pub fn generate(tree: &dyn ResourceTree, options: &GenOptions) -> Result<WriteDiffer, SyncError> {
    let entries = scan(tree, &options.scan)?;
    tracing::info!("collected {} dashboards", entries.len());

    let renderer = Renderer::new(options.template_dir.as_deref())?;
    let rendered = renderer.render_manifest(&options.template, entries)?;

    let mut wd = WriteDiffer::new();
    wd.insert(options.output.clone(), rendered);
    Ok(wd)
}

/// Generate, then write or verify according to `mode`.
pub fn run(
    tree: &dyn ResourceTree,
    options: &GenOptions,
    mode: Mode,
) -> Result<RunOutcome, SyncError> {
    tracing::debug!("run mode: {mode}");
    let wd = generate(tree, options)?;
    match mode {
        Mode::Create => Ok(RunOutcome::Written(wd.write()?)),
        Mode::Verify => {
            wd.verify()?;
            Ok(RunOutcome::Verified { files: wd.len() })
        }
    }
}
