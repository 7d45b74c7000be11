//! # Veridoc Ledger
//!
//! Append-only in-memory document registry: the simulated distributed ledger
//! behind document provenance.
//!
//! A registration binds a content hash to an issuer, a document type, a
//! storage address, and opaque metadata. The registry is single-writer and
//! append-only: records are never edited, and re-registering a hash appends
//! a superseding record rather than mutating the old one.
//!
//! ## Key Types
//!
//! - [`Ledger`] - The registry: register, verify, list, stats, commitment
//! - [`Registration`] / [`RegisterOutcome`] - What an append did
//! - [`NetworkModel`] - Pluggable operational noise (confirmations, network
//!   descriptors), deterministic in tests

pub mod error;
pub mod noise;
pub mod registry;

pub use error::{LedgerError, Result};
pub use noise::{NetworkDescriptors, NetworkModel, SimulatedNetwork};
pub use registry::{Ledger, LedgerStats, ListQuery, RecordPage, RegisterOutcome, Registration};
