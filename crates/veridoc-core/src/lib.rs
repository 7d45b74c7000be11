//! # Veridoc Core
//!
//! Pure primitives for veridoc: content identifiers, document records, and
//! canonicalization.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`ContentHash`] - Blake3 digest of document bytes (primary ledger key)
//! - [`ContentAddress`] - Domain-separated address of a stored blob
//! - [`TransactionId`] - Opaque random registration identifier
//! - [`DocumentRecord`] - One completed ledger registration
//!
//! ## Canonicalization
//!
//! Records are encoded using deterministic CBOR before hashing, so Merkle
//! commitments are stable across platforms. See [`canonical`] module.

pub mod canonical;
pub mod error;
pub mod hash;
pub mod merkle;
pub mod record;

pub use canonical::canonical_record_bytes;
pub use error::CoreError;
pub use hash::{ContentAddress, ContentHash, TransactionId};
pub use merkle::merkle_root;
pub use record::{DocumentRecord, RecordDraft, RECORD_VERSION};
