//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: memory-backed storage, a
//! ledger with pinned network noise, and ready-made record drafts.

use std::sync::Arc;

use veridoc_core::{ContentAddress, ContentHash, RecordDraft};
use veridoc_ledger::{Ledger, Registration};
use veridoc_store::{MemoryArchive, MemoryGateway, RedundantStore};

use crate::signals::FixedNetwork;

/// Fixed registration timestamp used across fixtures (2025-01-14 UTC).
pub const FIXED_TIME: i64 = 1736870400000;

/// Memory-backed components wired with deterministic noise.
///
/// The backend handles stay public so tests can flip outages mid-run.
pub struct TestFixture {
    pub gateway: Arc<MemoryGateway>,
    pub archive: Arc<MemoryArchive>,
    pub ledger: Ledger,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            gateway: Arc::new(MemoryGateway::new()),
            archive: Arc::new(MemoryArchive::new()),
            ledger: Ledger::with_network(Arc::new(FixedNetwork::default())),
        }
    }

    /// Redundant store over this fixture's backends.
    pub fn store(&self) -> RedundantStore {
        RedundantStore::new(self.gateway.clone(), self.archive.clone())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Draft for arbitrary content under the given identity.
pub fn draft(issuer: &str, document_type: &str, bytes: &[u8]) -> RecordDraft {
    RecordDraft::new(
        issuer,
        document_type,
        ContentHash::hash(bytes),
        ContentAddress::derive(bytes),
    )
    .registered_at(FIXED_TIME)
}

/// Ministry-of-interior passport draft, the canonical happy-path record.
pub fn passport_draft(bytes: &[u8]) -> RecordDraft {
    draft("ministry-of-interior", "passport", bytes).metadata("country", "AE")
}

/// Register `count` distinct documents, one second apart.
pub fn seed_ledger(ledger: &Ledger, count: usize) -> Vec<Registration> {
    (0..count)
        .map(|i| {
            let body = format!("certificate {:04}", i);
            ledger.register(
                draft("records-office", "certificate", body.as_bytes())
                    .registered_at(FIXED_TIME + i as i64 * 1_000),
            )
        })
        .collect()
}
