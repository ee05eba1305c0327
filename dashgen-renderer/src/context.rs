//! Template context — the single value bound into the manifest template.

use serde::{Deserialize, Serialize};

use dashgen_core::NormalizedEntry;

/// Rendering payload for the dashboard manifest.
///
/// Templates see `dashboards` as a list of `{ name, path }` objects, already
/// in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestContext {
    pub dashboards: Vec<NormalizedEntry>,
}

impl ManifestContext {
    pub fn new(dashboards: Vec<NormalizedEntry>) -> Self {
        ManifestContext { dashboards }
    }
}
