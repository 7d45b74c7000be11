//! Composite scoring policy.
//!
//! Each format starts from a baseline and loses points per finding by
//! severity. Baselines and weights are policy, owned by the caller's
//! configuration rather than baked into the checks.

use serde::{Deserialize, Serialize};

use crate::finding::{AnomalyFinding, Severity};

/// Baseline and per-severity penalties for one document family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatWeights {
    pub baseline: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl FormatWeights {
    /// The penalty one finding of the given severity costs.
    pub fn penalty(&self, severity: Severity) -> f64 {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Composite score for a set of findings, clamped to [0,100].
    pub fn score(&self, findings: &[AnomalyFinding]) -> f64 {
        let penalty: f64 = findings.iter().map(|f| self.penalty(f.severity)).sum();
        (self.baseline - penalty).clamp(0.0, 100.0)
    }
}

/// Scoring policy across both document families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Text documents (PDF).
    pub text: FormatWeights,
    /// Raster images (PNG, JPEG).
    pub raster: FormatWeights,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            text: FormatWeights {
                baseline: 95.0,
                high: 15.0,
                medium: 8.0,
                low: 3.0,
            },
            raster: FormatWeights {
                baseline: 92.0,
                high: 20.0,
                medium: 10.0,
                low: 4.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::AnomalyKind;

    fn finding(severity: Severity) -> AnomalyFinding {
        AnomalyFinding::new(AnomalyKind::MissingMetadata, severity, "test")
    }

    #[test]
    fn test_no_findings_scores_baseline() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.text.score(&[]), 95.0);
        assert_eq!(policy.raster.score(&[]), 92.0);
    }

    #[test]
    fn test_penalties_subtract_by_severity() {
        let policy = ScoringPolicy::default();
        let findings = vec![
            finding(Severity::High),
            finding(Severity::Medium),
            finding(Severity::Low),
        ];
        // 95 - 15 - 8 - 3
        assert_eq!(policy.text.score(&findings), 69.0);
        // 92 - 20 - 10 - 4
        assert_eq!(policy.raster.score(&findings), 58.0);
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let weights = FormatWeights {
            baseline: 30.0,
            high: 20.0,
            medium: 10.0,
            low: 5.0,
        };
        let findings = vec![
            finding(Severity::High),
            finding(Severity::High),
            finding(Severity::Medium),
        ];
        assert_eq!(weights.score(&findings), 0.0);
    }

    #[test]
    fn test_score_clamps_at_hundred() {
        let weights = FormatWeights {
            baseline: 120.0,
            high: 20.0,
            medium: 10.0,
            low: 5.0,
        };
        assert_eq!(weights.score(&[]), 100.0);
    }
}
