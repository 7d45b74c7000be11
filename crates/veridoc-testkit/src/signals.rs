//! Deterministic stand-ins for every simulated provider.
//!
//! Production wiring draws edge suspicion, font counts, recompression
//! coins, model predictions, and confirmation counts from random or
//! external sources. These implementations pin each one so analyzer and
//! ledger output is reproducible byte for byte.

use std::sync::Arc;

use async_trait::async_trait;
use veridoc_analysis::{
    AnalysisError, ForensicSignals, ModelLoader, Prediction, Tensor, VisualModel,
};
use veridoc_ledger::{NetworkDescriptors, NetworkModel};

// ─── Forensic signals ───────────────────────────────────────────────────────

/// Pixel-level signals pinned to fixed values.
#[derive(Debug, Clone, Copy)]
pub struct FixedSignals {
    pub edge_suspicion: f64,
    pub detected_fonts: u32,
    pub recompression: bool,
}

impl FixedSignals {
    /// Signals that trigger none of the forensic checks.
    pub fn quiet() -> Self {
        Self {
            edge_suspicion: 0.0,
            detected_fonts: 1,
            recompression: false,
        }
    }

    /// Signals that trigger every check that reads them.
    pub fn noisy() -> Self {
        Self {
            edge_suspicion: 0.95,
            detected_fonts: 4,
            recompression: true,
        }
    }
}

impl ForensicSignals for FixedSignals {
    fn edge_suspicion(&self) -> f64 {
        self.edge_suspicion
    }

    fn detected_fonts(&self) -> u32 {
        self.detected_fonts
    }

    fn recompression_detected(&self) -> bool {
        self.recompression
    }
}

// ─── Classifier models ──────────────────────────────────────────────────────

/// Model that reports the same probability for every input.
pub struct FixedModel {
    pub probability: f64,
    pub confidence: Option<f64>,
    pub version: String,
}

impl FixedModel {
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            confidence: None,
            version: "fixed-test".to_string(),
        }
    }
}

impl VisualModel for FixedModel {
    fn version(&self) -> &str {
        &self.version
    }

    fn predict(&self, _input: Tensor) -> veridoc_analysis::Result<Prediction> {
        Ok(Prediction {
            forgery_probability: self.probability,
            authentic_probability: self.confidence,
        })
    }
}

/// Loader that serves a [`FixedModel`] under any name.
pub struct FixedLoader {
    probability: f64,
}

impl FixedLoader {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Loader whose model reads everything as genuine.
    pub fn genuine() -> Self {
        Self::new(0.05)
    }

    /// Loader whose model crosses every flag band.
    pub fn forged() -> Self {
        Self::new(0.85)
    }
}

#[async_trait]
impl ModelLoader for FixedLoader {
    async fn load(&self, _name: &str) -> veridoc_analysis::Result<Arc<dyn VisualModel>> {
        Ok(Arc::new(FixedModel::new(self.probability)))
    }
}

/// Loader that refuses every name; exercises the failure cache.
pub struct UnavailableLoader;

#[async_trait]
impl ModelLoader for UnavailableLoader {
    async fn load(&self, name: &str) -> veridoc_analysis::Result<Arc<dyn VisualModel>> {
        Err(AnalysisError::ModelLoad {
            model: name.to_string(),
            reason: "loader disabled".to_string(),
        })
    }
}

// ─── Network noise ──────────────────────────────────────────────────────────

/// Network noise pinned to constants.
#[derive(Debug, Clone, Copy)]
pub struct FixedNetwork {
    pub confirmations: u32,
}

impl FixedNetwork {
    pub fn new(confirmations: u32) -> Self {
        Self { confirmations }
    }
}

impl Default for FixedNetwork {
    fn default() -> Self {
        Self::new(12)
    }
}

impl NetworkModel for FixedNetwork {
    fn confirmations(&self) -> u32 {
        self.confirmations
    }

    fn descriptors(
        &self,
        _total_registrations: u64,
        last_registered_at: Option<i64>,
    ) -> NetworkDescriptors {
        NetworkDescriptors {
            hash_rate_ths: 1.0,
            average_block_interval_ms: 2000,
            difficulty: 1_000_000,
            last_block_at: last_registered_at,
        }
    }
}
