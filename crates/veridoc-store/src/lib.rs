//! # Veridoc Store
//!
//! Redundant blob storage for Veridoc. Document bytes are kept on two
//! backends with different failure modes: a content-addressed gateway and
//! a keyed object archive.
//!
//! ## Overview
//!
//! The backends sit behind the [`ContentGateway`] and [`ObjectArchive`]
//! traits. [`RedundantStore`] composes one of each: writes land on the
//! gateway and are mirrored to the archive in the background, reads prefer
//! the gateway and fail over to the archive with a checksum check. The
//! persistent archive implementation is [`SqliteArchive`]; in-memory
//! backends with outage switches exist for testing.
//!
//! ## Key Types
//!
//! - [`RedundantStore`] - Put/get/pin/delete across both backends
//! - [`ContentGateway`] - The primary, pin-based backend trait
//! - [`ObjectArchive`] - The secondary, key-listing backend trait
//! - [`SqliteArchive`] - SQLite-based persistent archive
//! - [`MemoryGateway`], [`MemoryArchive`] - In-memory backends for tests
//! - [`DeleteReport`] - What a best-effort delete actually removed
//! - [`StorageStats`] - Usage across backends and the local index
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use veridoc_store::{MemoryGateway, RedundantStore, SqliteArchive};
//!
//! async fn example() {
//!     let gateway = Arc::new(MemoryGateway::new());
//!     let archive = Arc::new(SqliteArchive::open("archive.db").unwrap());
//!     let store = RedundantStore::new(gateway, archive);
//!
//!     let address = store.put(Bytes::from_static(b"document")).await.unwrap();
//!     let bytes = store.get(&address).await.unwrap();
//!     assert_eq!(bytes.as_ref(), b"document");
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Write survival**: A put succeeds if either backend accepts it
//! - **Verified failover**: Archive reads are checksummed before use
//! - **Best-effort delete**: Partial failures are reported, not raised
//! - **Content addresses**: A gateway outage falls back to the derived
//!   address, so the same bytes resolve to the same address either way

pub mod error;
pub mod memory;
pub mod migration;
pub mod redundant;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::{MemoryArchive, MemoryGateway};
pub use redundant::{
    ArchiveStats, DeleteFailure, DeleteReport, GatewayStats, IndexStats, RedundantStore,
    StorageStats, StoreConfig,
};
pub use sqlite::SqliteArchive;
pub use traits::{
    archive_key, archive_prefix, ArchiveMeta, ArchivedObject, BackendKind, BackendUsage,
    ContentGateway, ObjectArchive, ObjectLocation, StorageObject,
};
