//! # Veridoc Testkit
//!
//! Testing utilities for Veridoc.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Synthetic documents**: Minimal PDFs, PNGs and JPEGs the analysis
//!   crate parses for real
//! - **Deterministic providers**: Fixed forensic signals, classifier
//!   models, and network noise
//! - **Fixtures**: Memory-backed components for kernel-level tests
//! - **Generators**: Proptest strategies for registry types
//!
//! ## Synthetic Documents
//!
//! ```rust
//! use veridoc_testkit::docs;
//!
//! let pdf = docs::clean_pdf();
//! let scan = docs::edited_jpeg();
//! assert!(pdf.starts_with(b"%PDF-"));
//! ```
//!
//! ## Deterministic Providers
//!
//! Swap these in wherever production wiring uses randomness:
//!
//! ```rust
//! use std::sync::Arc;
//! use veridoc_ledger::Ledger;
//! use veridoc_testkit::signals::{FixedNetwork, FixedSignals};
//!
//! let ledger = Ledger::with_network(Arc::new(FixedNetwork::new(12)));
//! let quiet = FixedSignals::quiet();
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use veridoc_testkit::generators::{draft_from_params, DraftParams};
//!
//! proptest! {
//!     #[test]
//!     fn registration_is_deterministic(params: DraftParams) {
//!         let d1 = draft_from_params(&params);
//!         let d2 = draft_from_params(&params);
//!         prop_assert_eq!(d1.content_hash(), d2.content_hash());
//!     }
//! }
//! ```

pub mod docs;
pub mod fixtures;
pub mod generators;
pub mod signals;

pub use fixtures::{draft, passport_draft, seed_ledger, TestFixture, FIXED_TIME};
pub use generators::{draft_from_params, DraftParams};
pub use signals::{FixedLoader, FixedModel, FixedNetwork, FixedSignals, UnavailableLoader};
