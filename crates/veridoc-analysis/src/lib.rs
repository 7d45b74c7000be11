//! # Veridoc Analysis
//!
//! Forgery screening for uploaded documents: format-aware structural
//! analysis plus a visual classifier, both feeding the decision layer.
//!
//! ## Overview
//!
//! Two independent passes look at a document. [`DocumentAnalyzer`] parses
//! the payload (PDF, PNG or JPEG), collects [`AnomalyFinding`]s from its
//! metadata and structure, and folds them into a composite score under a
//! [`ScoringPolicy`]. [`ClassifierEngine`] runs a visual model over a
//! fixed-shape sample of the bytes and reports a forgery probability with
//! threshold-banded flags. Models load lazily, cache by name, and share
//! one load across concurrent callers. Both passes take permits from a
//! [`WorkerPool`] so analysis cannot saturate the runtime.
//!
//! ## Key Types
//!
//! - [`DocumentAnalyzer`] - Parse, find anomalies, produce a score
//! - [`AnalysisResult`] - Score, findings and the parsed profile
//! - [`ClassifierEngine`] - Cached model loading plus inference
//! - [`ClassifierResult`] - Probability, confidence and raised flags
//! - [`ForensicSignals`] - Pixel-level signal source; swap in fixed
//!   values for deterministic tests
//! - [`ModelLoader`] / [`VisualModel`] - Where real model backends plug in
//!
//! ## Usage
//!
//! ```rust,no_run
//! use veridoc_analysis::{ClassifierEngine, DocumentAnalyzer, WorkerPool};
//!
//! async fn example(document: &[u8]) {
//!     let pool = WorkerPool::sized_to_cores();
//!     let analyzer = DocumentAnalyzer::new(pool.clone());
//!     let engine = ClassifierEngine::builtin(pool);
//!
//!     let analysis = analyzer.analyze(document, Some("pdf")).await.unwrap();
//!     let verdict = engine.classify(document).await.unwrap();
//!     println!(
//!         "score {} / forgery probability {}",
//!         analysis.composite_score, verdict.forgery_probability
//!     );
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Magic bytes win**: A recognizable signature overrides any format
//!   hint the caller supplies
//! - **Real parsing, simulated pixels**: Metadata and structure come from
//!   the actual bytes; pixel-level signals sit behind [`ForensicSignals`]
//! - **Single-flight loads**: Concurrent callers of an unloaded model
//!   wait on one load; failures are cached for a backoff window
//! - **Bounded concurrency**: One [`WorkerPool`] permit per analysis or
//!   inference call

pub mod analyzer;
pub mod classify;
pub mod error;
pub mod finding;
pub mod forensic;
pub mod media;
pub mod pool;
pub mod score;
pub mod signal;
pub mod structural;

pub use analyzer::{AnalysisResult, DocumentAnalyzer, DocumentProfile};
pub use classify::{
    ClassifierEngine, ClassifierFlag, ClassifierResult, ModelLoader, Prediction, Tensor,
    VisualModel, DEFAULT_MODEL,
};
pub use error::{AnalysisError, Result};
pub use finding::{AnomalyFinding, AnomalyKind, Severity};
pub use media::{DocumentFormat, PdfProfile, RasterProfile};
pub use pool::WorkerPool;
pub use score::{FormatWeights, ScoringPolicy};
pub use signal::{ForensicSignals, SimulatedSignals};
