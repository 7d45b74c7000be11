//! Authenticity decision policy.
//!
//! Three independent legs feed the decision: the ledger lookup, the
//! structural/forensic composite score, and the classifier's authenticity
//! confidence. Every leg must pass; any single failure forces
//! `authentic = false`. "Appears forged" is a result, not an error.

use serde::{Deserialize, Serialize};

use veridoc_analysis::{AnalysisResult, ClassifierResult};
use veridoc_core::DocumentRecord;

/// Decision thresholds. Both comparisons are strict: a document sitting
/// exactly on a threshold does not pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// Composite analysis score the document must exceed.
    pub min_composite_score: f64,
    /// Classifier authenticity confidence the document must exceed.
    pub min_authenticity_confidence: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            min_composite_score: 85.0,
            min_authenticity_confidence: 0.9,
        }
    }
}

/// The decision plus which legs carried it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub authentic: bool,
    /// The content hash has a current ledger record.
    pub registered: bool,
    /// Composite score cleared the threshold.
    pub score_passed: bool,
    /// Authenticity confidence cleared the threshold.
    pub confidence_passed: bool,
}

impl DecisionPolicy {
    /// Evaluate the three legs against this policy.
    pub fn decide(
        &self,
        record: Option<&DocumentRecord>,
        analysis: &AnalysisResult,
        classifier: &ClassifierResult,
    ) -> Verdict {
        let registered = record.is_some();
        let score_passed = analysis.composite_score > self.min_composite_score;
        let confidence_passed =
            classifier.authenticity_confidence > self.min_authenticity_confidence;

        Verdict {
            authentic: registered && score_passed && confidence_passed,
            registered,
            score_passed,
            confidence_passed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use veridoc_analysis::{AnalysisResult, ClassifierResult, DocumentProfile, PdfProfile};
    use veridoc_core::{ContentAddress, ContentHash, RecordDraft, TransactionId};

    fn analysis(score: f64) -> AnalysisResult {
        AnalysisResult {
            composite_score: score,
            findings: vec![],
            profile: DocumentProfile::Text(PdfProfile {
                pages: 1,
                text_length: 120,
                has_images: false,
                creation_date: Some("D:20240101000000Z".to_string()),
                producer: Some("LibreOffice 7.6".to_string()),
                creator: None,
            }),
            elapsed: Duration::from_millis(3),
        }
    }

    fn classifier(confidence: f64) -> ClassifierResult {
        ClassifierResult {
            forgery_probability: 1.0 - confidence,
            authenticity_confidence: confidence,
            flags: vec![],
            model_version: "v3.2.1".to_string(),
        }
    }

    fn record() -> DocumentRecord {
        RecordDraft::new(
            "ministry-of-interior",
            "passport",
            ContentHash::hash(b"scan"),
            ContentAddress::derive(b"scan"),
        )
        .registered_at(1736870400000)
        .into_record(1, TransactionId::ZERO, 12)
    }

    #[test]
    fn test_all_legs_pass() {
        let verdict = DecisionPolicy::default().decide(
            Some(&record()),
            &analysis(95.0),
            &classifier(0.97),
        );
        assert!(verdict.authentic);
        assert!(verdict.registered && verdict.score_passed && verdict.confidence_passed);
    }

    #[test]
    fn test_ledger_miss_forces_rejection() {
        let verdict =
            DecisionPolicy::default().decide(None, &analysis(95.0), &classifier(0.97));
        assert!(!verdict.authentic);
        assert!(!verdict.registered);
        assert!(verdict.score_passed && verdict.confidence_passed);
    }

    #[test]
    fn test_low_score_forces_rejection() {
        let verdict = DecisionPolicy::default().decide(
            Some(&record()),
            &analysis(60.0),
            &classifier(0.97),
        );
        assert!(!verdict.authentic);
        assert!(!verdict.score_passed);
    }

    #[test]
    fn test_low_confidence_forces_rejection() {
        let verdict = DecisionPolicy::default().decide(
            Some(&record()),
            &analysis(95.0),
            &classifier(0.5),
        );
        assert!(!verdict.authentic);
        assert!(!verdict.confidence_passed);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let policy = DecisionPolicy::default();

        let on_score = policy.decide(Some(&record()), &analysis(85.0), &classifier(0.97));
        assert!(!on_score.score_passed);

        let on_confidence = policy.decide(Some(&record()), &analysis(95.0), &classifier(0.9));
        assert!(!on_confidence.confidence_passed);
    }

    #[test]
    fn test_custom_thresholds() {
        let lax = DecisionPolicy {
            min_composite_score: 50.0,
            min_authenticity_confidence: 0.5,
        };
        let verdict = lax.decide(Some(&record()), &analysis(60.0), &classifier(0.6));
        assert!(verdict.authentic);
    }
}
