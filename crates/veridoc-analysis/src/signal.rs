//! Forensic signal providers.
//!
//! Three of the raster checks lean on instrumentation this codebase does
//! not ship: an edge-discontinuity detector, typeface recognition, and a
//! recompression estimator. Their outputs come through this trait so the
//! production stand-in can be swapped for deterministic values in tests,
//! or for real detectors later.

use rand::Rng;

/// Source of the simulated forensic measurements.
pub trait ForensicSignals: Send + Sync {
    /// Edge-discontinuity suspicion in [0,1].
    fn edge_suspicion(&self) -> f64;

    /// Number of distinct typefaces recognized in the image.
    fn detected_fonts(&self) -> u32;

    /// Whether the recompression estimator fires for a low-density image.
    fn recompression_detected(&self) -> bool;
}

/// Stand-in provider drawing from thread-local randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSignals;

impl ForensicSignals for SimulatedSignals {
    fn edge_suspicion(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }

    fn detected_fonts(&self) -> u32 {
        rand::thread_rng().gen_range(1..=3)
    }

    fn recompression_detected(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}
