//! Queries for the artifacts table.

use rusqlite::{params, Connection, OptionalExtension};
use threadshape_core::errors::StorageError;

/// Metadata of one stored artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRow {
    pub key: String,
    pub byte_len: i64,
    pub updated_at: i64,
}

/// Insert or replace the payload stored under `key`.
pub fn upsert(conn: &Connection, key: &str, payload: &[u8], updated_at: i64) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO artifacts (key, payload, byte_len, updated_at) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(key) DO UPDATE SET
            payload = excluded.payload,
            byte_len = excluded.byte_len,
            updated_at = excluded.updated_at",
    )
    .and_then(|mut stmt| stmt.execute(params![key, payload, payload.len() as i64, updated_at]))
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    Ok(())
}

/// Payload stored under `key`, if any.
pub fn select_payload(conn: &Connection, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
    conn.prepare_cached("SELECT payload FROM artifacts WHERE key = ?1")
        .and_then(|mut stmt| stmt.query_row(params![key], |row| row.get(0)).optional())
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}

pub fn exists(conn: &Connection, key: &str) -> Result<bool, StorageError> {
    conn.prepare_cached("SELECT EXISTS(SELECT 1 FROM artifacts WHERE key = ?1)")
        .and_then(|mut stmt| stmt.query_row(params![key], |row| row.get::<_, bool>(0)))
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}

pub fn delete(conn: &Connection, key: &str) -> Result<(), StorageError> {
    conn.execute("DELETE FROM artifacts WHERE key = ?1", params![key])
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    Ok(())
}

/// Metadata for every stored artifact, ordered by key.
pub fn list(conn: &Connection) -> Result<Vec<ArtifactRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT key, byte_len, updated_at FROM artifacts ORDER BY key")
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ArtifactRow {
                key: row.get(0)?,
                byte_len: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}
