//! In-memory backend implementations.
//!
//! Same semantics as the production backends but held in process memory,
//! with an offline switch so tests can exercise outage and failover paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use veridoc_core::ContentAddress;

use crate::error::{Result, StoreError};
use crate::traits::{ArchiveMeta, ArchivedObject, BackendUsage, ContentGateway, ObjectArchive};

/// In-memory content gateway.
///
/// Addresses are derived from the content bytes, so the same bytes always
/// land at the same address. All data is lost when the gateway is dropped.
pub struct MemoryGateway {
    inner: RwLock<GatewayInner>,
    offline: AtomicBool,
}

struct GatewayInner {
    objects: HashMap<ContentAddress, Bytes>,
    pinned: HashSet<ContentAddress>,
}

impl MemoryGateway {
    /// Create a new empty gateway.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(GatewayInner {
                objects: HashMap::new(),
                pinned: HashSet::new(),
            }),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate an outage: while offline, every call fails with
    /// `BackendUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Whether an address is currently pinned.
    pub fn is_pinned(&self, address: &ContentAddress) -> bool {
        self.inner.read().unwrap().pinned.contains(address)
    }

    /// Number of objects held.
    pub fn object_count(&self) -> usize {
        self.inner.read().unwrap().objects.len()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::BackendUnavailable("gateway offline".into()));
        }
        Ok(())
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGateway for MemoryGateway {
    async fn add(&self, bytes: Bytes) -> Result<ContentAddress> {
        self.check_online()?;
        let address = ContentAddress::derive(&bytes);

        let mut inner = self.inner.write().unwrap();
        inner.objects.insert(address, bytes);
        inner.pinned.insert(address);

        Ok(address)
    }

    async fn fetch(&self, address: &ContentAddress) -> Result<Bytes> {
        self.check_online()?;
        let inner = self.inner.read().unwrap();
        inner
            .objects
            .get(address)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(address.to_hex()))
    }

    async fn pin(&self, address: &ContentAddress) -> Result<()> {
        self.check_online()?;
        let mut inner = self.inner.write().unwrap();
        if !inner.objects.contains_key(address) {
            return Err(StoreError::NotFound(address.to_hex()));
        }
        inner.pinned.insert(*address);
        Ok(())
    }

    async fn unpin(&self, address: &ContentAddress) -> Result<()> {
        self.check_online()?;
        let mut inner = self.inner.write().unwrap();
        inner.pinned.remove(address);
        Ok(())
    }
}

/// In-memory object archive.
///
/// Keys are held in a BTreeMap, so prefix listing is an ordered range scan.
pub struct MemoryArchive {
    inner: RwLock<BTreeMap<String, StoredObject>>,
    offline: AtomicBool,
}

struct StoredObject {
    bytes: Bytes,
    meta: ArchiveMeta,
}

impl MemoryArchive {
    /// Create a new empty archive.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate an outage: while offline, every call fails with
    /// `BackendUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Plant an object directly, bypassing the online check.
    ///
    /// Lets tests stage pre-existing or deliberately inconsistent archive
    /// contents (for example a body that no longer matches its checksum).
    pub fn put_raw(&self, key: &str, bytes: Bytes, meta: ArchiveMeta) {
        self.inner
            .write()
            .unwrap()
            .insert(key.to_string(), StoredObject { bytes, meta });
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::BackendUnavailable("archive offline".into()));
        }
        Ok(())
    }
}

impl Default for MemoryArchive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectArchive for MemoryArchive {
    async fn put_object(&self, key: &str, bytes: Bytes, meta: &ArchiveMeta) -> Result<()> {
        self.check_online()?;
        self.inner.write().unwrap().insert(
            key.to_string(),
            StoredObject {
                bytes,
                meta: meta.clone(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<ArchivedObject> {
        self.check_online()?;
        let inner = self.inner.read().unwrap();
        inner
            .get(key)
            .map(|obj| ArchivedObject {
                bytes: obj.bytes.clone(),
                meta: obj.meta.clone(),
            })
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        self.check_online()?;
        let inner = self.inner.read().unwrap();
        Ok(inner
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.check_online()?;
        self.inner.write().unwrap().remove(key);
        Ok(())
    }

    async fn usage(&self) -> Result<BackendUsage> {
        self.check_online()?;
        let inner = self.inner.read().unwrap();
        Ok(BackendUsage {
            objects: inner.len() as u64,
            bytes: inner.values().map(|obj| obj.bytes.len() as u64).sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veridoc_core::ContentHash;

    fn meta_for(bytes: &Bytes) -> ArchiveMeta {
        ArchiveMeta {
            source_address: ContentAddress::derive(bytes),
            checksum: ContentHash::hash(bytes),
            uploaded_at: 1736870400000,
        }
    }

    #[tokio::test]
    async fn test_gateway_add_fetch_roundtrip() {
        let gateway = MemoryGateway::new();
        let bytes = Bytes::from_static(b"document body");

        let address = gateway.add(bytes.clone()).await.unwrap();
        assert_eq!(address, ContentAddress::derive(&bytes));
        assert!(gateway.is_pinned(&address));

        let fetched = gateway.fetch(&address).await.unwrap();
        assert_eq!(fetched, bytes);
    }

    #[tokio::test]
    async fn test_gateway_fetch_unknown_is_not_found() {
        let gateway = MemoryGateway::new();
        let err = gateway
            .fetch(&ContentAddress::derive(b"never stored"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_gateway_offline_rejects_everything() {
        let gateway = MemoryGateway::new();
        let bytes = Bytes::from_static(b"x");
        let address = gateway.add(bytes.clone()).await.unwrap();

        gateway.set_offline(true);
        assert!(matches!(
            gateway.add(bytes).await.unwrap_err(),
            StoreError::BackendUnavailable(_)
        ));
        assert!(matches!(
            gateway.fetch(&address).await.unwrap_err(),
            StoreError::BackendUnavailable(_)
        ));

        gateway.set_offline(false);
        assert!(gateway.fetch(&address).await.is_ok());
    }

    #[tokio::test]
    async fn test_gateway_unpin_idempotent() {
        let gateway = MemoryGateway::new();
        let address = gateway.add(Bytes::from_static(b"pin me")).await.unwrap();

        gateway.unpin(&address).await.unwrap();
        assert!(!gateway.is_pinned(&address));
        // Second unpin and unknown-address unpin both succeed
        gateway.unpin(&address).await.unwrap();
        gateway
            .unpin(&ContentAddress::derive(b"unknown"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_archive_prefix_listing() {
        let archive = MemoryArchive::new();
        let a = Bytes::from_static(b"aaa");
        let b = Bytes::from_static(b"bbb");

        archive
            .put_object("documents/0011/1", a.clone(), &meta_for(&a))
            .await
            .unwrap();
        archive
            .put_object("documents/0011/2", a.clone(), &meta_for(&a))
            .await
            .unwrap();
        archive
            .put_object("documents/ffee/1", b.clone(), &meta_for(&b))
            .await
            .unwrap();

        let keys = archive.list_keys("documents/0011/").await.unwrap();
        assert_eq!(keys, vec!["documents/0011/1", "documents/0011/2"]);

        let all = archive.list_keys("documents/").await.unwrap();
        assert_eq!(all.len(), 3);

        let none = archive.list_keys("documents/9999/").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_archive_get_and_delete() {
        let archive = MemoryArchive::new();
        let bytes = Bytes::from_static(b"archived");
        let meta = meta_for(&bytes);

        archive
            .put_object("documents/ab/1", bytes.clone(), &meta)
            .await
            .unwrap();

        let obj = archive.get_object("documents/ab/1").await.unwrap();
        assert_eq!(obj.bytes, bytes);
        assert_eq!(obj.meta, meta);

        archive.delete_object("documents/ab/1").await.unwrap();
        assert!(matches!(
            archive.get_object("documents/ab/1").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_archive_usage() {
        let archive = MemoryArchive::new();
        assert_eq!(archive.usage().await.unwrap(), BackendUsage::default());

        let bytes = Bytes::from_static(b"12345");
        archive
            .put_object("k1", bytes.clone(), &meta_for(&bytes))
            .await
            .unwrap();
        archive
            .put_object("k2", bytes.clone(), &meta_for(&bytes))
            .await
            .unwrap();

        let usage = archive.usage().await.unwrap();
        assert_eq!(usage.objects, 2);
        assert_eq!(usage.bytes, 10);
    }
}
