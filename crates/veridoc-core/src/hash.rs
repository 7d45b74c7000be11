//! Content identifiers for the provenance core.
//!
//! Three 32-byte newtypes: the Blake3 digest of document bytes, the
//! domain-separated storage address, and the opaque ledger transaction id.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Domain prefix for storage address derivation.
const ADDRESS_DOMAIN: &[u8] = b"veridoc-address-v0:";

/// A 32-byte Blake3 digest identifying document content.
///
/// This is the primary key of the ledger: two byte streams collide only
/// if their Blake3 digests collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Compute the Blake3 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(CoreError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero hash (sentinel value).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for ContentHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ContentHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 32-byte storage address for a stored blob.
///
/// Derived from the content bytes under a domain prefix, so an address
/// computed during a primary outage matches the address computed on a
/// healthy path for the same bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentAddress(pub [u8; 32]);

impl ContentAddress {
    /// Derive the address for the given content bytes.
    pub fn derive(data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ADDRESS_DOMAIN);
        hasher.update(data);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(CoreError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero address (sentinel value).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for ContentAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ContentAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// An opaque 32-byte ledger transaction identifier.
///
/// Random, not derived: two registrations of the same content get
/// distinct transaction ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub [u8; 32]);

impl TransactionId {
    /// Generate a fresh random transaction id.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(CoreError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero id (invalid, used as placeholder).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for TransactionId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for TransactionId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_deterministic() {
        let data = b"test document";
        let h1 = ContentHash::hash(data);
        let h2 = ContentHash::hash(data);
        assert_eq!(h1, h2);

        let different = b"another document";
        let h3 = ContentHash::hash(different);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_content_hash_hex_roundtrip() {
        let hash = ContentHash::hash(b"roundtrip");
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        let recovered = ContentHash::from_hex(&hex).unwrap();
        assert_eq!(hash, recovered);
    }

    #[test]
    fn test_content_hash_from_hex_rejects_bad_input() {
        assert!(matches!(
            ContentHash::from_hex("abcd"),
            Err(CoreError::InvalidLength(2))
        ));
        assert!(matches!(
            ContentHash::from_hex("not hex at all"),
            Err(CoreError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_address_differs_from_content_hash() {
        let data = b"same bytes, different domains";
        let hash = ContentHash::hash(data);
        let address = ContentAddress::derive(data);
        // Domain separation: address derivation never equals the bare digest
        assert_ne!(hash.as_bytes(), address.as_bytes());
    }

    #[test]
    fn test_address_deterministic() {
        let data = b"stable address";
        assert_eq!(ContentAddress::derive(data), ContentAddress::derive(data));
    }

    #[test]
    fn test_transaction_id_random() {
        let a = TransactionId::random();
        let b = TransactionId::random();
        assert_ne!(a, b);
        assert_ne!(a, TransactionId::ZERO);
    }
}
