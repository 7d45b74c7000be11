//! Kernel configuration.

use serde::Deserialize;
use veridoc_analysis::{ScoringPolicy, DEFAULT_MODEL};

use crate::decision::DecisionPolicy;
use crate::error::Result;

/// Configuration for the kernel.
///
/// Every field has a default; a TOML document only names what it changes.
/// Scoring weights are replaced per format table, not merged field by
/// field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Thresholds applied by full verification.
    pub decision: DecisionPolicy,

    /// Baselines and penalty weights for the analyzer.
    pub scoring: ScoringPolicy,

    /// Permits for the shared analysis worker pool; 0 sizes it to the
    /// available cores.
    pub worker_permits: usize,

    /// Timeout for each storage backend call, in milliseconds.
    pub backend_timeout_ms: u64,

    /// Classifier model used by full verification.
    pub model: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            decision: DecisionPolicy::default(),
            scoring: ScoringPolicy::default(),
            worker_permits: 0,
            backend_timeout_ms: 5_000,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl KernelConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
