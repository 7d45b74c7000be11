//! Backend traits: the abstract interfaces for blob storage.
//!
//! Two backends with different shapes: a content-addressed gateway (the
//! primary) and a key-value object archive (the mirror). The redundant
//! store composes one of each.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use veridoc_core::{ContentAddress, ContentHash};

use crate::error::Result;

/// Which backend holds or served an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// The primary content-addressed gateway.
    Gateway,
    /// The secondary object archive.
    Archive,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Gateway => write!(f, "gateway"),
            BackendKind::Archive => write!(f, "archive"),
        }
    }
}

/// One durable location of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub backend: BackendKind,
    /// Backend-specific key: the address hex for the gateway, the object
    /// key for the archive.
    pub key: String,
}

/// Local index entry for a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageObject {
    pub address: ContentAddress,
    pub size: u64,
    /// Every known durable location. At least one after a successful put.
    pub locations: Vec<ObjectLocation>,
    pub pinned: bool,
    pub uploaded_at: i64,
}

/// Metadata recorded alongside each archived object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMeta {
    /// The content address the object was mirrored from.
    pub source_address: ContentAddress,
    /// Digest of the stored body, verified on the failover read path.
    pub checksum: ContentHash,
    /// When the object was written (Unix milliseconds).
    pub uploaded_at: i64,
}

/// An object fetched from the archive.
#[derive(Debug, Clone)]
pub struct ArchivedObject {
    pub bytes: Bytes,
    pub meta: ArchiveMeta,
}

/// Object count and byte total for one backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendUsage {
    pub objects: u64,
    pub bytes: u64,
}

/// The archive key prefix holding all objects for a content address.
pub fn archive_prefix(address: &ContentAddress) -> String {
    format!("documents/{}/", address.to_hex())
}

/// The archive key for one mirrored copy.
pub fn archive_key(address: &ContentAddress, uploaded_at: i64) -> String {
    format!("documents/{}/{}", address.to_hex(), uploaded_at)
}

/// The primary backend: content-addressed, pin-based retention.
///
/// `add` derives the address from the bytes and retains the object
/// durably (the upload pins). `pin` refreshes retention for an address
/// the gateway already holds.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Upload bytes with durable retention. Returns the content address.
    async fn add(&self, bytes: Bytes) -> Result<ContentAddress>;

    /// Fetch the bytes for an address.
    async fn fetch(&self, address: &ContentAddress) -> Result<Bytes>;

    /// Refresh durable retention for an address the gateway holds.
    async fn pin(&self, address: &ContentAddress) -> Result<()>;

    /// Drop retention for an address. Idempotent: unknown addresses are
    /// not an error.
    async fn unpin(&self, address: &ContentAddress) -> Result<()>;
}

/// The secondary backend: flat keyed objects with listable prefixes.
#[async_trait]
pub trait ObjectArchive: Send + Sync {
    /// Store an object at the given key.
    async fn put_object(&self, key: &str, bytes: Bytes, meta: &ArchiveMeta) -> Result<()>;

    /// Fetch the object at the given key.
    async fn get_object(&self, key: &str) -> Result<ArchivedObject>;

    /// List keys under a prefix, in key order.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Delete the object at the given key.
    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Total object count and bytes held.
    async fn usage(&self) -> Result<BackendUsage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_key_lives_under_prefix() {
        let address = ContentAddress::derive(b"some document");
        let prefix = archive_prefix(&address);
        let key = archive_key(&address, 1736870400000);
        assert!(key.starts_with(&prefix));
        assert!(prefix.ends_with('/'));
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Gateway.to_string(), "gateway");
        assert_eq!(BackendKind::Archive.to_string(), "archive");
    }
}
