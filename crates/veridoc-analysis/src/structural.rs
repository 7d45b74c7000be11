//! Structural checks for text documents.

use crate::finding::{AnomalyFinding, AnomalyKind, Severity};
use crate::media::{PdfProfile, MIN_TEXT_LENGTH};

/// Run the structural checks over a parsed text document.
///
/// Genuine issued documents carry authoring metadata and a body of text;
/// each check flags a departure from that shape.
pub fn findings(profile: &PdfProfile) -> Vec<AnomalyFinding> {
    let mut findings = Vec::new();

    if profile.creation_date.is_none() {
        findings.push(AnomalyFinding::new(
            AnomalyKind::MissingMetadata,
            Severity::Medium,
            "missing creation date",
        ));
    }

    if let Some(producer) = &profile.producer {
        if producer.to_lowercase().contains("photoshop") {
            findings.push(
                AnomalyFinding::new(
                    AnomalyKind::SuspiciousSoftware,
                    Severity::High,
                    "document produced with image editing software",
                )
                .with_evidence(producer.clone()),
            );
        }
    }

    if profile.text_length < MIN_TEXT_LENGTH {
        findings.push(AnomalyFinding::new(
            AnomalyKind::LowContent,
            Severity::Low,
            "very little text content detected",
        ));
    }

    findings
}
