//! SQLite implementation of the ObjectArchive trait.
//!
//! The durable mirror backend. Uses rusqlite with bundled SQLite, wrapped
//! in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use veridoc_core::{ContentAddress, ContentHash};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{ArchiveMeta, ArchivedObject, BackendUsage, ObjectArchive};

/// SQLite-backed object archive.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteArchive {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteArchive {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
        Some(format!("mutex poisoned: {}", e)),
    ))
}

fn join_failed(e: tokio::task::JoinError) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
        Some(format!("spawn_blocking failed: {}", e)),
    ))
}

// Helper to convert a row to ArchivedObject
fn row_to_object(row: &rusqlite::Row<'_>) -> rusqlite::Result<ArchivedObject> {
    let source_bytes: Vec<u8> = row.get("source_address")?;
    let checksum_bytes: Vec<u8> = row.get("checksum")?;
    let body: Vec<u8> = row.get("body")?;

    let source_address = ContentAddress::from_bytes(source_bytes.try_into().map_err(|_| {
        rusqlite::Error::InvalidColumnType(0, "source_address".into(), rusqlite::types::Type::Blob)
    })?);
    let checksum = ContentHash::from_bytes(checksum_bytes.try_into().map_err(|_| {
        rusqlite::Error::InvalidColumnType(1, "checksum".into(), rusqlite::types::Type::Blob)
    })?);

    Ok(ArchivedObject {
        bytes: Bytes::from(body),
        meta: ArchiveMeta {
            source_address,
            checksum,
            uploaded_at: row.get("uploaded_at")?,
        },
    })
}

#[async_trait]
impl ObjectArchive for SqliteArchive {
    async fn put_object(&self, key: &str, bytes: Bytes, meta: &ArchiveMeta) -> Result<()> {
        let key = key.to_string();
        let meta = meta.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            conn.execute(
                "INSERT INTO objects (key, source_address, checksum, size, uploaded_at, body)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(key) DO UPDATE SET
                    source_address = excluded.source_address,
                    checksum = excluded.checksum,
                    size = excluded.size,
                    uploaded_at = excluded.uploaded_at,
                    body = excluded.body",
                params![
                    &key,
                    meta.source_address.as_bytes().as_slice(),
                    meta.checksum.as_bytes().as_slice(),
                    bytes.len() as i64,
                    meta.uploaded_at,
                    bytes.as_ref(),
                ],
            )?;

            Ok(())
        })
        .await
        .map_err(join_failed)?
    }

    async fn get_object(&self, key: &str) -> Result<ArchivedObject> {
        let key = key.to_string();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            conn.query_row(
                "SELECT source_address, checksum, uploaded_at, body
                 FROM objects WHERE key = ?1",
                params![&key],
                row_to_object,
            )
            .optional()?
            .ok_or(StoreError::NotFound(key))
        })
        .await
        .map_err(join_failed)?
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.to_string();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            let mut stmt =
                conn.prepare("SELECT key FROM objects WHERE key LIKE ?1 || '%' ORDER BY key")?;

            let keys = stmt
                .query_map(params![&prefix], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;

            Ok(keys)
        })
        .await
        .map_err(join_failed)?
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;
            conn.execute("DELETE FROM objects WHERE key = ?1", params![&key])?;
            Ok(())
        })
        .await
        .map_err(join_failed)?
    }

    async fn usage(&self) -> Result<BackendUsage> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(size), 0) FROM objects",
                [],
                |row| {
                    Ok(BackendUsage {
                        objects: row.get::<_, i64>(0)? as u64,
                        bytes: row.get::<_, i64>(1)? as u64,
                    })
                },
            )
            .map_err(StoreError::from)
        })
        .await
        .map_err(join_failed)?
    }
}
