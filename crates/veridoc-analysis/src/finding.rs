//! Anomaly findings produced by the analyzers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How strongly a finding suggests tampering.
///
/// Ordering follows penalty weight: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// What kind of irregularity a check detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Required authoring metadata is absent.
    MissingMetadata,
    /// The document was produced by software associated with image editing.
    SuspiciousSoftware,
    /// Too little extracted text for a genuine document.
    LowContent,
    /// Edge discontinuities consistent with spliced regions.
    EdgeManipulation,
    /// More typefaces than a single-source document should carry.
    FontInconsistency,
    /// Signs of repeated lossy recompression.
    CompressionArtifacts,
    /// An embedded tag names a known editing tool.
    EditingSoftware,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnomalyKind::MissingMetadata => "missing_metadata",
            AnomalyKind::SuspiciousSoftware => "suspicious_software",
            AnomalyKind::LowContent => "low_content",
            AnomalyKind::EdgeManipulation => "edge_manipulation",
            AnomalyKind::FontInconsistency => "font_inconsistency",
            AnomalyKind::CompressionArtifacts => "compression_artifacts",
            AnomalyKind::EditingSoftware => "editing_software",
        };
        write!(f, "{}", name)
    }
}

/// One detected irregularity.
///
/// Findings are consumed by the scoring policy and surfaced in reports;
/// they are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub description: String,
    /// Detector confidence in [0,1], where the check produces one.
    pub confidence: Option<f64>,
    /// Supporting detail, e.g. the tool name or font count behind the call.
    pub evidence: Option<String>,
}

impl AnomalyFinding {
    /// A finding with no confidence or evidence attached.
    pub fn new(kind: AnomalyKind, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            confidence: None,
            evidence: None,
        }
    }

    /// Attach a detector confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Attach supporting evidence.
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_orders_by_weight() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_kind_display_is_snake_case() {
        assert_eq!(AnomalyKind::MissingMetadata.to_string(), "missing_metadata");
        assert_eq!(AnomalyKind::EdgeManipulation.to_string(), "edge_manipulation");
    }

    #[test]
    fn test_builder_attaches_detail() {
        let finding = AnomalyFinding::new(
            AnomalyKind::FontInconsistency,
            Severity::Medium,
            "multiple font types detected",
        )
        .with_evidence("3 fonts");

        assert_eq!(finding.evidence.as_deref(), Some("3 fonts"));
        assert!(finding.confidence.is_none());
    }
}
