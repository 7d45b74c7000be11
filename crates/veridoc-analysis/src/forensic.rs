//! Forensic checks for raster images.

use crate::finding::{AnomalyFinding, AnomalyKind, Severity};
use crate::media::RasterProfile;
use crate::signal::ForensicSignals;

/// Edge suspicion above this is treated as manipulation.
pub const EDGE_SUSPICION_THRESHOLD: f64 = 0.6;

/// More typefaces than this marks the image as inconsistent.
pub const MAX_CONSISTENT_FONTS: u32 = 2;

/// Declared density below this makes recompression plausible.
pub const LOW_DENSITY_DPI: u32 = 80;

/// Density assumed when the file declares none.
pub const DEFAULT_DENSITY_DPI: u32 = 72;

/// Run the forensic checks over a parsed raster image.
pub fn findings(profile: &RasterProfile, signals: &dyn ForensicSignals) -> Vec<AnomalyFinding> {
    let mut findings = Vec::new();

    let edge = signals.edge_suspicion();
    if edge > EDGE_SUSPICION_THRESHOLD {
        findings.push(
            AnomalyFinding::new(
                AnomalyKind::EdgeManipulation,
                Severity::High,
                "suspicious edge patterns detected",
            )
            .with_confidence(edge),
        );
    }

    let fonts = signals.detected_fonts();
    if fonts > MAX_CONSISTENT_FONTS {
        findings.push(
            AnomalyFinding::new(
                AnomalyKind::FontInconsistency,
                Severity::Medium,
                "multiple font types detected",
            )
            .with_evidence(format!("{} fonts", fonts)),
        );
    }

    // Recompression only plausibly shows at low declared density
    let density = profile.density.unwrap_or(DEFAULT_DENSITY_DPI);
    if density < LOW_DENSITY_DPI && signals.recompression_detected() {
        findings.push(AnomalyFinding::new(
            AnomalyKind::CompressionArtifacts,
            Severity::Medium,
            "evidence of multiple compression cycles",
        ));
    }

    if let Some(software) = &profile.software {
        if software.contains("Photoshop") || software.contains("GIMP") {
            findings.push(
                AnomalyFinding::new(
                    AnomalyKind::EditingSoftware,
                    Severity::High,
                    format!("image edited with {}", software),
                )
                .with_evidence(software.clone()),
            );
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::DocumentFormat;

    struct FixedSignals {
        edge: f64,
        fonts: u32,
        recompression: bool,
    }

    impl ForensicSignals for FixedSignals {
        fn edge_suspicion(&self) -> f64 {
            self.edge
        }
        fn detected_fonts(&self) -> u32 {
            self.fonts
        }
        fn recompression_detected(&self) -> bool {
            self.recompression
        }
    }

    fn quiet() -> FixedSignals {
        FixedSignals {
            edge: 0.1,
            fonts: 1,
            recompression: false,
        }
    }

    fn clean_profile() -> RasterProfile {
        RasterProfile {
            format: DocumentFormat::Jpeg,
            width: 800,
            height: 600,
            channels: 3,
            bit_depth: 8,
            has_alpha: false,
            density: Some(300),
            software: None,
        }
    }

    #[test]
    fn test_clean_image_has_no_findings() {
        assert!(findings(&clean_profile(), &quiet()).is_empty());
    }

    #[test]
    fn test_edge_suspicion_above_threshold() {
        let signals = FixedSignals {
            edge: 0.85,
            ..quiet()
        };
        let found = findings(&clean_profile(), &signals);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AnomalyKind::EdgeManipulation);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].confidence, Some(0.85));
    }

    #[test]
    fn test_edge_suspicion_at_threshold_is_quiet() {
        let signals = FixedSignals {
            edge: EDGE_SUSPICION_THRESHOLD,
            ..quiet()
        };
        assert!(findings(&clean_profile(), &signals).is_empty());
    }

    #[test]
    fn test_three_fonts_is_inconsistent() {
        let signals = FixedSignals { fonts: 3, ..quiet() };
        let found = findings(&clean_profile(), &signals);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AnomalyKind::FontInconsistency);
        assert_eq!(found[0].evidence.as_deref(), Some("3 fonts"));
    }

    #[test]
    fn test_recompression_needs_low_density() {
        let signals = FixedSignals {
            recompression: true,
            ..quiet()
        };

        // High-density image: the estimator is not consulted
        assert!(findings(&clean_profile(), &signals).is_empty());

        let mut profile = clean_profile();
        profile.density = Some(72);
        let found = findings(&profile, &signals);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AnomalyKind::CompressionArtifacts);

        // Missing density falls back to the low default
        profile.density = None;
        assert_eq!(findings(&profile, &signals).len(), 1);
    }

    #[test]
    fn test_editing_software_tag() {
        let mut profile = clean_profile();
        profile.software = Some("Adobe Photoshop CC 2023".to_string());

        let found = findings(&profile, &quiet());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AnomalyKind::EditingSoftware);
        assert_eq!(found[0].severity, Severity::High);
        assert!(found[0].description.contains("Adobe Photoshop CC 2023"));

        profile.software = Some("GIMP 2.10".to_string());
        assert_eq!(findings(&profile, &quiet()).len(), 1);

        // A camera firmware tag raises nothing
        profile.software = Some("Canon EOS R5 1.2".to_string());
        assert!(findings(&profile, &quiet()).is_empty());
    }

    #[test]
    fn test_all_checks_stack() {
        let mut profile = clean_profile();
        profile.density = Some(60);
        profile.software = Some("GIMP".to_string());
        let signals = FixedSignals {
            edge: 0.9,
            fonts: 3,
            recompression: true,
        };

        let found = findings(&profile, &signals);
        assert_eq!(found.len(), 4);
    }
}
