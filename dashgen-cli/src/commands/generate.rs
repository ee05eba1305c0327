//! `dashgen` — render the manifest, then write it or verify the committed copy.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use dashgen_core::{config::DEFAULT_CONFIG_FILE, GenConfig, Mode};
use dashgen_sync::{pipeline, GenOptions, RunOutcome, SyncError, WriteResult};

/// Arguments for a generate or verify run.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// YAML config file (defaults to `dashgen.yaml` when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dashboard directory to scan.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Manifest path to write or verify.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory of `.tera` templates overriding the embedded ones.
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Check the committed manifest instead of writing it.
    #[arg(long)]
    pub verify: bool,
}

impl GenerateArgs {
    /// `verify_env` reports whether the verify environment toggle is set.
    pub fn run(self, verify_env: bool) -> Result<ExitCode> {
        let mode = if self.verify || verify_env {
            Mode::Verify
        } else {
            Mode::Create
        };
        let config = self.resolve_config()?;
        let tree = config.dir_tree();
        let options = GenOptions::from_config(&config);

        match pipeline::run(&tree, &options, mode) {
            Ok(RunOutcome::Written(writes)) => {
                print_writes(&writes);
                Ok(ExitCode::SUCCESS)
            }
            Ok(RunOutcome::Verified { files }) => {
                println!("{} {files} generated file(s) up to date", "✓".green());
                Ok(ExitCode::SUCCESS)
            }
            Err(SyncError::Mismatch(report)) => {
                eprintln!(
                    "{}\n{report}\nrun `{}` to regenerate\n",
                    "generated code is not up to date:".red().bold(),
                    config.regenerate_hint
                );
                Ok(ExitCode::FAILURE)
            }
            Err(err) => {
                let what = failure_label(&err, mode);
                Err(anyhow::Error::new(err).context(what.red().bold().to_string()))
            }
        }
    }

    /// Load the config file, then apply command-line overrides.
    fn resolve_config(&self) -> Result<GenConfig> {
        let mut config = match &self.config {
            Some(path) => GenConfig::load(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?,
            None => GenConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))
                .context("failed to load dashgen.yaml")?,
        };
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(dir) = &self.template_dir {
            config.template_dir = Some(dir.clone());
        }
        tracing::debug!("resolved config: {config:?}");
        Ok(config)
    }
}

/// Read and render failures happen before any file is touched, so only a
/// write failure gets the "to disk" label.
fn failure_label(err: &SyncError, mode: Mode) -> &'static str {
    match (err, mode) {
        (SyncError::Write { .. }, _) => "error while writing generated code to disk:",
        (_, Mode::Verify) => "error while verifying generated code:",
        (_, Mode::Create) => "error while generating code:",
    }
}

fn print_writes(writes: &[WriteResult]) {
    let written = writes
        .iter()
        .filter(|r| matches!(r, WriteResult::Written { .. }))
        .count();
    let unchanged = writes.len() - written;

    println!(
        "{} generated ({} written, {} unchanged)",
        "✓".green(),
        written,
        unchanged
    );
    for r in writes {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
}
