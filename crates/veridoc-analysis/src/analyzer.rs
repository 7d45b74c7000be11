//! Document analysis pipeline.
//!
//! Detects the payload format, parses the matching profile, collects
//! anomaly findings, and folds them into a composite score. Work runs
//! under the shared worker pool so a burst of uploads cannot saturate
//! the runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::finding::{AnomalyFinding, Severity};
use crate::forensic;
use crate::media::{DocumentFormat, PdfProfile, RasterProfile};
use crate::pool::WorkerPool;
use crate::score::ScoringPolicy;
use crate::signal::{ForensicSignals, SimulatedSignals};
use crate::structural;

/// Parsed shape of the analyzed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentProfile {
    Text(PdfProfile),
    Raster(RasterProfile),
}

impl DocumentProfile {
    pub fn format(&self) -> DocumentFormat {
        match self {
            DocumentProfile::Text(_) => DocumentFormat::Pdf,
            DocumentProfile::Raster(raster) => raster.format,
        }
    }
}

/// Outcome of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Integrity score in [0,100]; higher reads as more trustworthy.
    pub composite_score: f64,
    pub findings: Vec<AnomalyFinding>,
    pub profile: DocumentProfile,
    /// Wall-clock time the pass took.
    pub elapsed: Duration,
}

impl AnalysisResult {
    /// Highest severity among the findings.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

/// Format-dispatching analyzer.
pub struct DocumentAnalyzer {
    policy: ScoringPolicy,
    signals: Arc<dyn ForensicSignals>,
    pool: WorkerPool,
}

impl DocumentAnalyzer {
    pub fn new(pool: WorkerPool) -> Self {
        Self {
            policy: ScoringPolicy::default(),
            signals: Arc::new(SimulatedSignals),
            pool,
        }
    }

    /// Override the scoring weights.
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the forensic signal source; tests inject fixed values here.
    pub fn with_signals(mut self, signals: Arc<dyn ForensicSignals>) -> Self {
        self.signals = signals;
        self
    }

    /// Analyze one document payload.
    ///
    /// The hint only matters when the payload carries no recognizable
    /// signature; see [`DocumentFormat::detect`].
    pub async fn analyze(&self, bytes: &[u8], hint: Option<&str>) -> Result<AnalysisResult> {
        let _permit = self.pool.acquire().await;
        let started = Instant::now();

        let format = DocumentFormat::detect(bytes, hint)?;
        let (findings, profile) = if format.is_raster() {
            let raster = RasterProfile::parse(format, bytes)?;
            let findings = forensic::findings(&raster, self.signals.as_ref());
            (findings, DocumentProfile::Raster(raster))
        } else {
            let text = PdfProfile::parse(bytes)?;
            let findings = structural::findings(&text);
            (findings, DocumentProfile::Text(text))
        };

        let weights = match &profile {
            DocumentProfile::Text(_) => self.policy.text,
            DocumentProfile::Raster(_) => self.policy.raster,
        };
        let composite_score = weights.score(&findings);

        debug!(
            format = %format,
            score = composite_score,
            findings = findings.len(),
            "document analyzed"
        );

        Ok(AnalysisResult {
            composite_score,
            findings,
            profile,
            elapsed: started.elapsed(),
        })
    }
}
