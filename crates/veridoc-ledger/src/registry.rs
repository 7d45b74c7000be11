//! The append-only document registry.
//!
//! Single-writer, in-memory, indexed two ways: an ordered log keyed by
//! sequence number and a hash index pointing at the current record for each
//! content hash. Re-registering a hash appends a new record and re-points the
//! index; the prior record stays in the log but is no longer current.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use veridoc_core::{merkle_root, ContentHash, DocumentRecord, RecordDraft, TransactionId};

use crate::error::{LedgerError, Result};
use crate::noise::{NetworkDescriptors, NetworkModel, SimulatedNetwork};

/// Outcome of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterOutcome {
    /// First registration of this content hash.
    Registered,
    /// The hash was registered before; that record remains in the log but
    /// is no longer the current record.
    Superseded { previous_seq: u64 },
}

/// A completed registration: the appended record plus what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub record: DocumentRecord,
    pub outcome: RegisterOutcome,
}

/// Query parameters for [`Ledger::list`].
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// 1-indexed page number.
    pub page: u64,
    /// Records per page.
    pub page_size: u64,
    /// Substring filter over issuer, document type, and hash hex.
    pub filter: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            filter: None,
        }
    }
}

impl ListQuery {
    fn matches(&self, record: &DocumentRecord) -> bool {
        match &self.filter {
            None => true,
            Some(needle) => {
                record.issuer.contains(needle)
                    || record.document_type.contains(needle)
                    || record.content_hash.to_hex().contains(needle)
            }
        }
    }
}

/// One page of current records, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPage {
    pub records: Vec<DocumentRecord>,
    pub page: u64,
    pub page_size: u64,
    /// Number of current records matching the filter.
    pub total_filtered: u64,
    pub total_pages: u64,
}

impl RecordPage {
    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    pub fn has_prev(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}

/// Aggregate registry statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Distinct content hashes with a current record.
    pub total_documents: u64,
    /// Log length, including superseded records.
    pub total_registrations: u64,
    /// Highest assigned sequence number (0 when empty).
    pub current_seq: u64,
    /// Fabricated network descriptors from the noise model.
    pub network: NetworkDescriptors,
}

struct LedgerInner {
    /// Append-only log: seq -> record (1-indexed).
    log: BTreeMap<u64, DocumentRecord>,

    /// Current record per content hash.
    index: HashMap<ContentHash, u64>,

    /// Next sequence number to assign.
    next_seq: u64,
}

/// The append-only document registry.
///
/// Thread-safe via RwLock; writes serialize, reads see consistent snapshots.
/// Nothing inside the critical section suspends or performs I/O.
pub struct Ledger {
    network: Arc<dyn NetworkModel>,
    inner: RwLock<LedgerInner>,
}

impl Ledger {
    /// Create an empty registry with the default noise model.
    pub fn new() -> Self {
        Self::with_network(Arc::new(SimulatedNetwork))
    }

    /// Create an empty registry with the given noise model.
    pub fn with_network(network: Arc<dyn NetworkModel>) -> Self {
        Self {
            network,
            inner: RwLock::new(LedgerInner {
                log: BTreeMap::new(),
                index: HashMap::new(),
                next_seq: 1,
            }),
        }
    }

    /// Append a registration to the log.
    ///
    /// Assigns the next sequence number, a fresh transaction id, and a
    /// confirmation count from the noise model. If the content hash is
    /// already registered, the new record supersedes the old one and the
    /// outcome reports the superseded sequence number.
    pub fn register(&self, draft: RecordDraft) -> Registration {
        // Noise is drawn outside the critical section
        let transaction_id = TransactionId::random();
        let confirmations = self.network.confirmations();

        let mut inner = self.inner.write().unwrap();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let record = draft.into_record(seq, transaction_id, confirmations);
        let outcome = match inner.index.insert(record.content_hash, seq) {
            Some(previous_seq) => RegisterOutcome::Superseded { previous_seq },
            None => RegisterOutcome::Registered,
        };
        inner.log.insert(seq, record.clone());
        drop(inner);

        match outcome {
            RegisterOutcome::Registered => {
                debug!(seq, hash = %record.content_hash.to_hex(), "document registered");
            }
            RegisterOutcome::Superseded { previous_seq } => {
                warn!(
                    seq,
                    previous_seq,
                    hash = %record.content_hash.to_hex(),
                    "content hash re-registered; prior record superseded"
                );
            }
        }

        Registration { record, outcome }
    }

    /// Look up the current record for a content hash.
    ///
    /// An absent hash is a normal negative result, not an error.
    pub fn verify(&self, hash: &ContentHash) -> Option<DocumentRecord> {
        let inner = self.inner.read().unwrap();
        inner
            .index
            .get(hash)
            .and_then(|seq| inner.log.get(seq))
            .cloned()
    }

    /// Fetch the record at a given log position, current or superseded.
    pub fn record_at_seq(&self, seq: u64) -> Option<DocumentRecord> {
        let inner = self.inner.read().unwrap();
        inner.log.get(&seq).cloned()
    }

    /// Page through current records.
    ///
    /// Records are filtered, sorted newest-first (sequence number breaks
    /// timestamp ties, so pages never overlap and cover the filtered set
    /// exactly once), then paginated.
    pub fn list(&self, query: &ListQuery) -> Result<RecordPage> {
        if query.page == 0 || query.page_size == 0 {
            return Err(LedgerError::InvalidPagination {
                page: query.page,
                page_size: query.page_size,
            });
        }

        let inner = self.inner.read().unwrap();
        let mut records: Vec<DocumentRecord> = inner
            .index
            .values()
            .filter_map(|seq| inner.log.get(seq))
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        drop(inner);

        records.sort_by(|a, b| {
            b.registered_at
                .cmp(&a.registered_at)
                .then(b.seq.cmp(&a.seq))
        });

        let total_filtered = records.len() as u64;
        let total_pages = total_filtered.div_ceil(query.page_size);
        let start = (query.page - 1).saturating_mul(query.page_size);

        let records: Vec<DocumentRecord> = records
            .into_iter()
            .skip(start as usize)
            .take(query.page_size as usize)
            .collect();

        Ok(RecordPage {
            records,
            page: query.page,
            page_size: query.page_size,
            total_filtered,
            total_pages,
        })
    }

    /// Aggregate statistics over the registry.
    pub fn stats(&self) -> LedgerStats {
        let inner = self.inner.read().unwrap();
        let total_registrations = inner.log.len() as u64;
        let last_registered_at = inner.log.values().last().map(|r| r.registered_at);

        LedgerStats {
            total_documents: inner.index.len() as u64,
            total_registrations,
            current_seq: inner.next_seq - 1,
            network: self
                .network
                .descriptors(total_registrations, last_registered_at),
        }
    }

    /// Merkle commitment over the whole log, in sequence order.
    ///
    /// Superseded records participate: the commitment covers the log, not
    /// the current-record view.
    pub fn batch_commitment(&self) -> ContentHash {
        let inner = self.inner.read().unwrap();
        let records: Vec<DocumentRecord> = inner.log.values().cloned().collect();
        drop(inner);
        merkle_root(&records)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
