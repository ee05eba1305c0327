//! Generator configuration.
//!
//! Every field has a default matching the dev-dashboard manifest, so an empty
//! (or absent) `dashgen.yaml` reproduces the stock generator.
//!
//! ```yaml
//! root: devenv/dev-dashboards
//! output: devenv/dev-dashboards/gen.libsonnet
//! exclude:
//!   - jsonnetfile.json
//!   - jsonnetfile.lock.json
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::scan::{Normalizer, ScanOptions, DEFAULT_MAX_NAME_LEN, DEFAULT_SUFFIX};
use crate::tree::DirTree;
use crate::types::DEFAULT_EXCLUDE;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashgen.yaml";

/// Template rendered into the manifest by default.
pub const DEFAULT_TEMPLATE: &str = "gen.libsonnet.tera";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Directory scanned as the resource tree.
    pub root: PathBuf,
    /// Where the rendered manifest is written or verified.
    pub output: PathBuf,
    /// Template name rendered into `output`.
    pub template: String,
    /// Optional directory of `.tera` files overriding embedded templates.
    pub template_dir: Option<PathBuf>,
    /// Entry names skipped at every depth.
    pub exclude: Vec<String>,
    /// Suffix stripped from leaf names to form display names.
    pub suffix: String,
    /// Display-name cap, in characters. Must be at least 1.
    #[serde(deserialize_with = "non_zero_len")]
    pub max_name_len: usize,
    /// Leaf extensions picked up from `root`; empty means every file.
    pub bundle_extensions: Vec<String>,
    /// Command printed when verification finds stale output.
    pub regenerate_hint: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            root: PathBuf::from("."),
            output: PathBuf::from("gen.libsonnet"),
            template: DEFAULT_TEMPLATE.to_string(),
            template_dir: None,
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            suffix: DEFAULT_SUFFIX.to_string(),
            max_name_len: DEFAULT_MAX_NAME_LEN,
            bundle_extensions: vec!["json".to_string()],
            regenerate_hint: "make gen-jsonnet".to_string(),
        }
    }
}

fn non_zero_len<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let len = usize::deserialize(deserializer)?;
    if len == 0 {
        return Err(serde::de::Error::custom(
            "max_name_len must be at least 1, or every name would be empty",
        ));
    }
    Ok(len)
}

impl GenConfig {
    /// Load a config file. The file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound { path: path.to_path_buf() }
            } else {
                ConfigError::Io { path: path.to_path_buf(), source }
            }
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        // serde_yaml rejects an empty document for a struct; treat it as `{}`.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            exclusions: self.exclude.iter().cloned().collect(),
            normalizer: Normalizer::new(self.suffix.clone(), self.max_name_len),
        }
    }

    /// The on-disk resource tree described by `root` and `bundle_extensions`.
    pub fn dir_tree(&self) -> DirTree {
        DirTree::new(&self.root).with_extensions(self.bundle_extensions.iter().cloned())
    }
}
