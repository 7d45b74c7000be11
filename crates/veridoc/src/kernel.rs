//! The Kernel: unified API for the Veridoc system.
//!
//! The Kernel brings the registry, the redundant store, and the analysis
//! pipeline together into a cohesive interface for embedding applications.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use veridoc_analysis::{
    AnalysisResult, ClassifierEngine, ClassifierResult, DocumentAnalyzer, WorkerPool,
};
use veridoc_core::{ContentAddress, ContentHash, DocumentRecord, RecordDraft};
use veridoc_ledger::{Ledger, LedgerStats, ListQuery, RecordPage, Registration};
use veridoc_store::{ContentGateway, ObjectArchive, RedundantStore, StorageStats, StoreConfig};

use crate::config::KernelConfig;
use crate::decision::Verdict;
use crate::error::{KernelError, Result};

/// Everything a full verification produced.
///
/// The verdict is carried alongside its inputs so a caller (or an audit
/// log) can see which leg decided the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub verdict: Verdict,
    pub analysis: AnalysisResult,
    pub classifier: ClassifierResult,
    /// Current ledger record for the hash, if any.
    pub record: Option<DocumentRecord>,
    /// When the verification ran (Unix milliseconds).
    pub verified_at: i64,
}

/// The main Kernel struct.
///
/// Provides a unified API for:
/// - Registering documents (store redundantly, append a ledger record)
/// - Verifying content hashes against the registry
/// - Running analysis and classification over payloads
/// - Full document verification with a policy decision
pub struct Kernel {
    ledger: Ledger,
    store: RedundantStore,
    analyzer: DocumentAnalyzer,
    engine: ClassifierEngine,
    config: KernelConfig,
}

impl Kernel {
    /// Create a kernel over the given storage backends.
    pub fn new(
        gateway: Arc<dyn ContentGateway>,
        archive: Arc<dyn ObjectArchive>,
        config: KernelConfig,
    ) -> Self {
        let pool = if config.worker_permits == 0 {
            WorkerPool::sized_to_cores()
        } else {
            WorkerPool::with_permits(config.worker_permits)
        };
        let store_config = StoreConfig {
            backend_timeout: Duration::from_millis(config.backend_timeout_ms),
        };

        Self {
            ledger: Ledger::new(),
            store: RedundantStore::with_config(gateway, archive, store_config),
            analyzer: DocumentAnalyzer::new(pool.clone()).with_policy(config.scoring),
            engine: ClassifierEngine::builtin(pool).with_default_model(config.model.clone()),
            config,
        }
    }

    /// Replace the ledger; tests inject deterministic network noise here.
    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Replace the analyzer, keeping everything else.
    pub fn with_analyzer(mut self, analyzer: DocumentAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace the classifier engine, keeping everything else.
    pub fn with_classifier(mut self, engine: ClassifierEngine) -> Self {
        self.engine = engine;
        self
    }

    /// The ledger behind this kernel.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The store behind this kernel.
    pub fn store(&self) -> &RedundantStore {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a document: store the bytes redundantly, then append a
    /// ledger record pointing at the stored copy.
    pub async fn register(
        &self,
        bytes: Bytes,
        issuer: &str,
        document_type: &str,
    ) -> Result<Registration> {
        if bytes.is_empty() {
            return Err(KernelError::InvalidInput("empty document".to_string()));
        }

        let content_hash = ContentHash::hash(&bytes);
        let size = bytes.len();
        let address = self.store.put(bytes).await?;

        let draft = RecordDraft::new(issuer, document_type, content_hash, address)
            .metadata("size", size.to_string())
            .registered_at(now_millis());
        let registration = self.ledger.register(draft);

        info!(
            seq = registration.record.seq,
            hash = %content_hash.to_hex(),
            issuer,
            "document registered"
        );
        Ok(registration)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Look up the current ledger record for a content hash.
    ///
    /// An absent hash is a normal negative result, not an error.
    pub fn verify(&self, hash: &ContentHash) -> Option<DocumentRecord> {
        self.ledger.verify(hash)
    }

    /// Page through current records.
    pub fn list(&self, query: &ListQuery) -> Result<RecordPage> {
        Ok(self.ledger.list(query)?)
    }

    /// Retrieve stored document bytes by content address.
    pub async fn fetch(&self, address: &ContentAddress) -> Result<Bytes> {
        Ok(self.store.get(address).await?)
    }

    /// Registry statistics, including the fabricated network descriptors.
    pub fn ledger_stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    /// Usage across both storage backends and the local index.
    pub async fn storage_stats(&self) -> StorageStats {
        self.store.stats().await
    }

    /// Merkle commitment over the whole registration log.
    pub fn batch_commitment(&self) -> ContentHash {
        self.ledger.batch_commitment()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Run the structural/forensic analysis pass alone.
    pub async fn analyze(&self, bytes: &[u8], hint: Option<&str>) -> Result<AnalysisResult> {
        Ok(self.analyzer.analyze(bytes, hint).await?)
    }

    /// Run the visual classifier alone, with the configured model.
    pub async fn classify(&self, bytes: &[u8]) -> Result<ClassifierResult> {
        Ok(self.engine.classify(bytes).await?)
    }

    /// Full verification: analyze, classify, consult the ledger, decide.
    ///
    /// The caller states which hash it believes the bytes have; the kernel
    /// recomputes it and rejects a mismatch before consulting anything,
    /// since a wrong hash would make the ledger lookup meaningless.
    pub async fn verify_document(
        &self,
        bytes: &[u8],
        claimed_hash: &ContentHash,
    ) -> Result<VerificationReport> {
        let actual = ContentHash::hash(bytes);
        if actual != *claimed_hash {
            return Err(KernelError::InvalidInput(format!(
                "content hash mismatch: claimed {}, computed {}",
                claimed_hash.to_hex(),
                actual.to_hex()
            )));
        }

        let analysis = self.analyzer.analyze(bytes, None).await?;
        let classifier = self.engine.classify(bytes).await?;
        let record = self.ledger.verify(claimed_hash);
        let verdict = self
            .config
            .decision
            .decide(record.as_ref(), &analysis, &classifier);

        debug!(
            hash = %claimed_hash.to_hex(),
            authentic = verdict.authentic,
            score = analysis.composite_score,
            confidence = classifier.authenticity_confidence,
            "document verified"
        );

        Ok(VerificationReport {
            verdict,
            analysis,
            classifier,
            record,
            verified_at: now_millis(),
        })
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
