//! # Veridoc
//!
//! The unified API for the Veridoc system - document provenance through
//! an append-only registry, redundant content storage, and forgery
//! screening.
//!
//! ## Overview
//!
//! The Veridoc Kernel provides a portable library for:
//!
//! - **Registration**: Document bytes stored on two backends, then
//!   recorded in an append-only ledger keyed by content hash
//! - **Verification**: Hash lookup against the registry
//! - **Screening**: Structural/forensic analysis plus a visual
//!   classifier, folded into a policy decision
//!
//! ## Key Concepts
//!
//! - **Record**: Append-only. A re-registered hash supersedes, never
//!   overwrites; the old record stays in the log.
//! - **Content address**: Where the bytes live; derived from the bytes,
//!   so the same document always resolves to the same address.
//! - **Verdict**: Ledger hit AND score AND confidence, every leg strict.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use veridoc::{Kernel, KernelConfig};
//! use veridoc::store::{MemoryGateway, SqliteArchive};
//! use veridoc_core::ContentHash;
//!
//! async fn example() {
//!     let gateway = Arc::new(MemoryGateway::new());
//!     let archive = Arc::new(SqliteArchive::open("archive.db").unwrap());
//!     let kernel = Kernel::new(gateway, archive, KernelConfig::default());
//!
//!     // Register a document
//!     let scan = Bytes::from_static(b"attested passport scan");
//!     let registration = kernel
//!         .register(scan.clone(), "ministry-of-interior", "passport")
//!         .await
//!         .unwrap();
//!
//!     // Verify it later
//!     let hash = ContentHash::hash(&scan);
//!     let report = kernel.verify_document(&scan, &hash).await.unwrap();
//!     println!("authentic: {}", report.verdict.authentic);
//!     let _ = registration;
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `veridoc::core` - Hashes, addresses, records, Merkle commitments
//! - `veridoc::ledger` - The append-only registry
//! - `veridoc::store` - Redundant blob storage
//! - `veridoc::analysis` - Analyzers, scoring, and the classifier engine

pub mod config;
pub mod decision;
pub mod error;
pub mod kernel;

// Re-export component crates
pub use veridoc_analysis as analysis;
pub use veridoc_core as core;
pub use veridoc_ledger as ledger;
pub use veridoc_store as store;

// Re-export main types for convenience
pub use config::KernelConfig;
pub use decision::{DecisionPolicy, Verdict};
pub use error::{KernelError, Result};
pub use kernel::{Kernel, VerificationReport};

// Re-export commonly used component types
pub use veridoc_analysis::{AnalysisResult, ClassifierResult};
pub use veridoc_core::{ContentAddress, ContentHash, DocumentRecord, TransactionId};
pub use veridoc_ledger::{LedgerStats, ListQuery, RecordPage, RegisterOutcome, Registration};
pub use veridoc_store::StorageStats;
