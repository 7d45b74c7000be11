//! Redundant blob storage across a gateway and an archive.
//!
//! Writes go to the gateway first and are mirrored to the archive in the
//! background. Reads prefer the gateway and fail over to the archive with
//! a checksum check on the way out. A write survives as long as at least
//! one backend accepts it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use bytes::Bytes;
use veridoc_core::{ContentAddress, ContentHash};

use crate::error::{Result, StoreError};
use crate::traits::{
    archive_key, archive_prefix, ArchiveMeta, BackendKind, ContentGateway, ObjectArchive,
    ObjectLocation, StorageObject,
};

/// Tuning knobs for the redundant store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Upper bound on any single backend call.
    pub backend_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_secs(5),
        }
    }
}

/// One failed step of a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFailure {
    pub backend: BackendKind,
    /// The archive key involved, where one applies.
    pub key: Option<String>,
    pub reason: String,
}

/// What a delete managed to remove.
///
/// Deletes are best-effort across backends: each step that fails is
/// reported here rather than aborting the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReport {
    pub address: ContentAddress,
    pub unpinned: bool,
    pub archive_deleted: Vec<String>,
    pub failures: Vec<DeleteFailure>,
    pub index_removed: bool,
}

impl DeleteReport {
    /// True when every step succeeded.
    pub fn clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pinned retention as tracked by the local index.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GatewayStats {
    pub pinned_objects: u64,
    pub pinned_bytes: u64,
}

/// Archive usage, straight from the backend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ArchiveStats {
    pub objects: u64,
    pub bytes: u64,
    /// False when the archive could not be queried; counts are then zero.
    pub reachable: bool,
}

/// Totals over the local index.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub objects: u64,
    pub total_bytes: u64,
    pub pinned: u64,
    pub average_object_size: u64,
}

/// Combined view over both backends and the index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StorageStats {
    pub gateway: GatewayStats,
    pub archive: ArchiveStats,
    pub index: IndexStats,
}

/// Content store with a primary gateway and a mirroring archive.
pub struct RedundantStore {
    gateway: Arc<dyn ContentGateway>,
    archive: Arc<dyn ObjectArchive>,
    config: StoreConfig,
    /// Local bookkeeping of known objects and their locations.
    index: Arc<RwLock<HashMap<ContentAddress, StorageObject>>>,
    /// In-flight background mirror uploads.
    mirrors: tokio::sync::Mutex<JoinSet<()>>,
}

impl RedundantStore {
    /// Create a store over the given backends with default config.
    pub fn new(gateway: Arc<dyn ContentGateway>, archive: Arc<dyn ObjectArchive>) -> Self {
        Self::with_config(gateway, archive, StoreConfig::default())
    }

    /// Create a store with explicit config.
    pub fn with_config(
        gateway: Arc<dyn ContentGateway>,
        archive: Arc<dyn ObjectArchive>,
        config: StoreConfig,
    ) -> Self {
        Self {
            gateway,
            archive,
            config,
            index: Arc::new(RwLock::new(HashMap::new())),
            mirrors: tokio::sync::Mutex::new(JoinSet::new()),
        }
    }

    /// Store a document.
    ///
    /// Healthy path: upload to the gateway (which pins), then mirror to the
    /// archive in the background. A mirror failure is logged, never
    /// surfaced. When the gateway is down, the address is derived from the
    /// content and the archive write happens synchronously instead; only
    /// when both backends refuse does the put fail.
    pub async fn put(&self, bytes: Bytes) -> Result<ContentAddress> {
        let uploaded_at = now_millis();
        let checksum = ContentHash::hash(&bytes);
        let size = bytes.len() as u64;

        match bounded(self.config.backend_timeout, self.gateway.add(bytes.clone())).await {
            Ok(address) => {
                let object = StorageObject {
                    address,
                    size,
                    locations: vec![ObjectLocation {
                        backend: BackendKind::Gateway,
                        key: address.to_hex(),
                    }],
                    pinned: true,
                    uploaded_at,
                };
                self.index.write().unwrap().insert(address, object);
                debug!(address = %address.to_hex(), size, "stored document via gateway");

                self.spawn_mirror(address, bytes, checksum, uploaded_at).await;
                Ok(address)
            }
            Err(err) => {
                warn!(error = %err, "gateway put failed, falling back to archive");

                let address = ContentAddress::derive(&bytes);
                let key = archive_key(&address, uploaded_at);
                let meta = ArchiveMeta {
                    source_address: address,
                    checksum,
                    uploaded_at,
                };
                bounded(
                    self.config.backend_timeout,
                    self.archive.put_object(&key, bytes, &meta),
                )
                .await?;

                let object = StorageObject {
                    address,
                    size,
                    locations: vec![ObjectLocation {
                        backend: BackendKind::Archive,
                        key,
                    }],
                    pinned: false,
                    uploaded_at,
                };
                self.index.write().unwrap().insert(address, object);
                debug!(address = %address.to_hex(), size, "stored document via archive only");
                Ok(address)
            }
        }
    }

    /// Fetch a document's bytes.
    ///
    /// Prefers the gateway; on any gateway failure falls over to the first
    /// archived copy under the address prefix, verifying its checksum.
    /// `NotFound` means neither backend holds the document.
    pub async fn get(&self, address: &ContentAddress) -> Result<Bytes> {
        match bounded(self.config.backend_timeout, self.gateway.fetch(address)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                warn!(
                    address = %address.to_hex(),
                    error = %err,
                    "gateway fetch failed, trying archive"
                );

                let prefix = archive_prefix(address);
                let keys =
                    bounded(self.config.backend_timeout, self.archive.list_keys(&prefix)).await?;
                let Some(key) = keys.first() else {
                    return Err(StoreError::NotFound(address.to_hex()));
                };

                let object =
                    bounded(self.config.backend_timeout, self.archive.get_object(key)).await?;
                if ContentHash::hash(&object.bytes) != object.meta.checksum {
                    return Err(StoreError::InvalidData(format!(
                        "archive checksum mismatch for {}",
                        key
                    )));
                }
                Ok(object.bytes)
            }
        }
    }

    /// Refresh gateway retention for an address.
    pub async fn pin(&self, address: &ContentAddress) -> Result<()> {
        bounded(self.config.backend_timeout, self.gateway.pin(address)).await?;
        if let Some(entry) = self.index.write().unwrap().get_mut(address) {
            entry.pinned = true;
        }
        Ok(())
    }

    /// Remove a document from both backends and the index.
    ///
    /// Best-effort: every step runs regardless of earlier failures, and the
    /// report says what actually happened.
    pub async fn delete(&self, address: &ContentAddress) -> DeleteReport {
        let mut report = DeleteReport {
            address: *address,
            unpinned: false,
            archive_deleted: Vec::new(),
            failures: Vec::new(),
            index_removed: false,
        };

        match bounded(self.config.backend_timeout, self.gateway.unpin(address)).await {
            Ok(()) => report.unpinned = true,
            Err(err) => report.failures.push(DeleteFailure {
                backend: BackendKind::Gateway,
                key: None,
                reason: err.to_string(),
            }),
        }

        let prefix = archive_prefix(address);
        match bounded(self.config.backend_timeout, self.archive.list_keys(&prefix)).await {
            Ok(keys) => {
                for key in keys {
                    match bounded(self.config.backend_timeout, self.archive.delete_object(&key))
                        .await
                    {
                        Ok(()) => report.archive_deleted.push(key),
                        Err(err) => report.failures.push(DeleteFailure {
                            backend: BackendKind::Archive,
                            key: Some(key),
                            reason: err.to_string(),
                        }),
                    }
                }
            }
            Err(err) => report.failures.push(DeleteFailure {
                backend: BackendKind::Archive,
                key: None,
                reason: err.to_string(),
            }),
        }

        report.index_removed = self.index.write().unwrap().remove(address).is_some();

        if !report.clean() {
            warn!(
                address = %address.to_hex(),
                failures = report.failures.len(),
                "delete completed with failures"
            );
        }
        report
    }

    /// Usage across both backends and the index.
    ///
    /// An unreachable archive yields zero counts with `reachable: false`
    /// rather than an error.
    pub async fn stats(&self) -> StorageStats {
        let (index_stats, gateway_stats) = {
            let index = self.index.read().unwrap();
            let objects = index.len() as u64;
            let total_bytes: u64 = index.values().map(|o| o.size).sum();
            let pinned = index.values().filter(|o| o.pinned).count() as u64;
            let pinned_bytes: u64 = index.values().filter(|o| o.pinned).map(|o| o.size).sum();

            (
                IndexStats {
                    objects,
                    total_bytes,
                    pinned,
                    average_object_size: if objects == 0 { 0 } else { total_bytes / objects },
                },
                GatewayStats {
                    pinned_objects: pinned,
                    pinned_bytes,
                },
            )
        };

        let archive = match bounded(self.config.backend_timeout, self.archive.usage()).await {
            Ok(usage) => ArchiveStats {
                objects: usage.objects,
                bytes: usage.bytes,
                reachable: true,
            },
            Err(err) => {
                warn!(error = %err, "archive usage unavailable");
                ArchiveStats::default()
            }
        };

        StorageStats {
            gateway: gateway_stats,
            archive,
            index: index_stats,
        }
    }

    /// The index entry for an address, if the store has seen it.
    pub fn lookup(&self, address: &ContentAddress) -> Option<StorageObject> {
        self.index.read().unwrap().get(address).cloned()
    }

    /// Wait for all in-flight mirror uploads to settle.
    pub async fn flush_mirrors(&self) {
        let mut mirrors = self.mirrors.lock().await;
        while mirrors.join_next().await.is_some() {}
    }

    async fn spawn_mirror(
        &self,
        address: ContentAddress,
        bytes: Bytes,
        checksum: ContentHash,
        uploaded_at: i64,
    ) {
        let archive = self.archive.clone();
        let index = self.index.clone();
        let timeout = self.config.backend_timeout;
        let key = archive_key(&address, uploaded_at);
        let meta = ArchiveMeta {
            source_address: address,
            checksum,
            uploaded_at,
        };

        let mut mirrors = self.mirrors.lock().await;
        mirrors.spawn(async move {
            match bounded(timeout, archive.put_object(&key, bytes, &meta)).await {
                Ok(()) => {
                    let mut index = index.write().unwrap();
                    if let Some(entry) = index.get_mut(&address) {
                        entry.locations.push(ObjectLocation {
                            backend: BackendKind::Archive,
                            key,
                        });
                    }
                }
                Err(err) => {
                    warn!(address = %address.to_hex(), error = %err, "archive mirror failed");
                }
            }
        });
        // Reap settled tasks so the set does not grow without bound
        while mirrors.try_join_next().is_some() {}
    }
}

/// Run a backend call under the configured time bound.
async fn bounded<T>(limit: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryArchive, MemoryGateway};
    use async_trait::async_trait;

    fn store_over(
        gateway: Arc<MemoryGateway>,
        archive: Arc<MemoryArchive>,
    ) -> RedundantStore {
        RedundantStore::new(gateway, archive)
    }

    #[tokio::test]
    async fn test_put_mirrors_to_archive() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        let bytes = Bytes::from_static(b"the document");
        let address = store.put(bytes.clone()).await.unwrap();
        store.flush_mirrors().await;

        assert!(gateway.is_pinned(&address));
        let keys = archive.list_keys(&archive_prefix(&address)).await.unwrap();
        assert_eq!(keys.len(), 1);

        let entry = store.lookup(&address).unwrap();
        assert!(entry.pinned);
        assert_eq!(entry.size, bytes.len() as u64);
        assert_eq!(entry.locations.len(), 2);
        assert_eq!(entry.locations[0].backend, BackendKind::Gateway);
        assert_eq!(entry.locations[1].backend, BackendKind::Archive);
    }

    #[tokio::test]
    async fn test_get_prefers_gateway() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        let bytes = Bytes::from_static(b"gateway copy");
        let address = store.put(bytes.clone()).await.unwrap();
        store.flush_mirrors().await;

        // Archive down does not matter while the gateway answers
        archive.set_offline(true);
        assert_eq!(store.get(&address).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_get_fails_over_to_archive() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        let bytes = Bytes::from_static(b"survives the outage");
        let address = store.put(bytes.clone()).await.unwrap();
        store.flush_mirrors().await;

        gateway.set_offline(true);
        assert_eq!(store.get(&address).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_get_unknown_address_is_not_found() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        gateway.set_offline(true);
        let err = store
            .get(&ContentAddress::derive(b"never stored"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_gateway_outage_put_goes_to_archive() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        gateway.set_offline(true);
        let bytes = Bytes::from_static(b"archive only");
        let address = store.put(bytes.clone()).await.unwrap();

        // Address is the content-derived one, nothing landed on the gateway
        assert_eq!(address, ContentAddress::derive(&bytes));
        assert_eq!(gateway.object_count(), 0);

        let entry = store.lookup(&address).unwrap();
        assert!(!entry.pinned);
        assert_eq!(entry.locations.len(), 1);
        assert_eq!(entry.locations[0].backend, BackendKind::Archive);

        // Still readable while the gateway is down
        assert_eq!(store.get(&address).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_put_fails_when_both_backends_down() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        gateway.set_offline(true);
        archive.set_offline(true);

        let err = store.put(Bytes::from_static(b"lost")).await.unwrap_err();
        assert!(matches!(err, StoreError::BackendUnavailable(_)));
        assert!(store.lookup(&ContentAddress::derive(b"lost")).is_none());
    }

    #[tokio::test]
    async fn test_mirror_failure_does_not_fail_put() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        archive.set_offline(true);
        let bytes = Bytes::from_static(b"gateway only");
        let address = store.put(bytes.clone()).await.unwrap();
        store.flush_mirrors().await;

        let entry = store.lookup(&address).unwrap();
        assert_eq!(entry.locations.len(), 1);
        assert_eq!(entry.locations[0].backend, BackendKind::Gateway);
        assert_eq!(store.get(&address).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_corrupted_archive_copy_is_rejected() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        let original = Bytes::from_static(b"authentic bytes");
        let address = ContentAddress::derive(&original);
        archive.put_raw(
            &archive_key(&address, 1),
            Bytes::from_static(b"tampered bytes!"),
            ArchiveMeta {
                source_address: address,
                checksum: ContentHash::hash(&original),
                uploaded_at: 1,
            },
        );

        gateway.set_offline(true);
        let err = store.get(&address).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_everywhere() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        let address = store.put(Bytes::from_static(b"doomed")).await.unwrap();
        store.flush_mirrors().await;

        let report = store.delete(&address).await;
        assert!(report.clean());
        assert!(report.unpinned);
        assert_eq!(report.archive_deleted.len(), 1);
        assert!(report.index_removed);

        assert!(!gateway.is_pinned(&address));
        assert!(archive
            .list_keys(&archive_prefix(&address))
            .await
            .unwrap()
            .is_empty());
        assert!(store.lookup(&address).is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_partial_failures() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        let address = store.put(Bytes::from_static(b"stuck")).await.unwrap();
        store.flush_mirrors().await;

        archive.set_offline(true);
        let report = store.delete(&address).await;

        assert!(report.unpinned);
        assert!(report.index_removed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].backend, BackendKind::Archive);
        assert!(report.archive_deleted.is_empty());
    }

    #[tokio::test]
    async fn test_stats_reflect_contents() {
        let gateway = Arc::new(MemoryGateway::new());
        let archive = Arc::new(MemoryArchive::new());
        let store = store_over(gateway.clone(), archive.clone());

        store.put(Bytes::from_static(b"12345")).await.unwrap();
        store.put(Bytes::from_static(b"1234567")).await.unwrap();
        store.flush_mirrors().await;

        let stats = store.stats().await;
        assert_eq!(stats.index.objects, 2);
        assert_eq!(stats.index.total_bytes, 12);
        assert_eq!(stats.index.pinned, 2);
        assert_eq!(stats.index.average_object_size, 6);
        assert_eq!(stats.gateway.pinned_objects, 2);
        assert_eq!(stats.archive.objects, 2);
        assert!(stats.archive.reachable);

        archive.set_offline(true);
        let stats = store.stats().await;
        assert!(!stats.archive.reachable);
        assert_eq!(stats.archive.objects, 0);
    }

    // A gateway whose calls never complete, for exercising time bounds.
    struct HangingGateway;

    #[async_trait]
    impl ContentGateway for HangingGateway {
        async fn add(&self, _bytes: Bytes) -> Result<ContentAddress> {
            std::future::pending().await
        }
        async fn fetch(&self, _address: &ContentAddress) -> Result<Bytes> {
            std::future::pending().await
        }
        async fn pin(&self, _address: &ContentAddress) -> Result<()> {
            std::future::pending().await
        }
        async fn unpin(&self, _address: &ContentAddress) -> Result<()> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_gateway_times_out_and_fails_over() {
        let archive = Arc::new(MemoryArchive::new());
        let store = RedundantStore::new(Arc::new(HangingGateway), archive.clone());

        let bytes = Bytes::from_static(b"slow lane");
        let address = store.put(bytes.clone()).await.unwrap();
        assert_eq!(address, ContentAddress::derive(&bytes));

        assert_eq!(store.get(&address).await.unwrap(), bytes);
    }
}
