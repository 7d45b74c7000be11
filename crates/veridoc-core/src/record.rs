//! Document records: the atomic unit of the provenance ledger.
//!
//! A record is an immutable registration event. Once appended it is never
//! edited; a re-registration of the same content appends a new record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canonical::canonical_record_bytes;
use crate::hash::{ContentAddress, ContentHash, TransactionId};

/// The current record schema version.
pub const RECORD_VERSION: u8 = 0;

/// A completed ledger registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Schema version (currently 0).
    pub version: u8,

    /// Blake3 digest of the registered document bytes. Primary ledger key.
    pub content_hash: ContentHash,

    /// Opaque random identifier assigned at registration.
    pub transaction_id: TransactionId,

    /// Position in the append-only log (1-indexed, monotonic).
    pub seq: u64,

    /// Authenticated issuer identity, as supplied by the caller.
    pub issuer: String,

    /// Free-form document type label ("passport", "certificate", ...).
    pub document_type: String,

    /// Where the registered bytes live in the blob store.
    pub storage_address: ContentAddress,

    /// Opaque caller metadata.
    pub metadata: BTreeMap<String, String>,

    /// Registration timestamp (Unix milliseconds). Caller-claimed.
    pub registered_at: i64,

    /// Operational confirmation count from the network model.
    pub confirmations: u32,

    /// Whether the registration is considered settled.
    pub confirmed: bool,
}

impl DocumentRecord {
    /// Compute the record digest (Blake3 hash of canonical bytes).
    ///
    /// This is the Merkle leaf value for batch commitments.
    pub fn digest(&self) -> ContentHash {
        ContentHash::hash(&canonical_record_bytes(self))
    }

    /// Short display form of the transaction id.
    pub fn transaction_hex(&self) -> String {
        self.transaction_id.to_hex()
    }
}

/// The caller-supplied half of a registration.
///
/// The ledger completes a draft into a [`DocumentRecord`] by assigning the
/// sequence number, transaction id, and confirmation count.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    issuer: String,
    document_type: String,
    content_hash: ContentHash,
    storage_address: ContentAddress,
    metadata: BTreeMap<String, String>,
    registered_at: i64,
}

impl RecordDraft {
    /// Start a draft for the given content.
    pub fn new(
        issuer: impl Into<String>,
        document_type: impl Into<String>,
        content_hash: ContentHash,
        storage_address: ContentAddress,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            document_type: document_type.into(),
            content_hash,
            storage_address,
            metadata: BTreeMap::new(),
            registered_at: 0,
        }
    }

    /// Attach a metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replace the whole metadata map.
    pub fn metadata_map(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the registration timestamp (Unix milliseconds).
    pub fn registered_at(mut self, ts: i64) -> Self {
        self.registered_at = ts;
        self
    }

    /// The content hash this draft registers.
    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    /// Complete the draft into a record.
    pub fn into_record(
        self,
        seq: u64,
        transaction_id: TransactionId,
        confirmations: u32,
    ) -> DocumentRecord {
        DocumentRecord {
            version: RECORD_VERSION,
            content_hash: self.content_hash,
            transaction_id,
            seq,
            issuer: self.issuer,
            document_type: self.document_type,
            storage_address: self.storage_address,
            metadata: self.metadata,
            registered_at: self.registered_at,
            confirmations,
            confirmed: true,
        }
    }
}
