use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Settings for one guide build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Directory receiving documents and archives.
    pub output_dir: PathBuf,
    /// Public prefix under which `output_dir` is served, e.g. `/outputs`.
    pub download_prefix: String,
    pub limits: TraversalLimits,
    pub failure_policy: FailurePolicy,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            download_prefix: "/outputs".to_string(),
            limits: TraversalLimits::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl GuideConfig {
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            output_dir = %self.output_dir.display(),
            download_prefix = %self.download_prefix,
            max_depth = self.limits.max_depth,
            max_nodes = self.limits.max_nodes,
            failure_policy = ?self.failure_policy,
            "Loaded GuideConfig"
        );
        debug!(?self, "GuideConfig loaded (full debug)");
    }
}

/// Upper bounds checked before any node is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalLimits {
    /// Deepest allowed node; roots are at depth 1.
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_nodes: 512,
        }
    }
}

/// What a traversal does when a node fails to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failure aborts the traversal; documents already written are removed.
    #[default]
    AllOrNothing,
    /// Failures are recorded per node and the traversal carries on.
    Partial,
}
