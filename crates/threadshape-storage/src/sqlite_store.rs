//! SQLite-backed artifact store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use threadshape_core::errors::StorageError;
use threadshape_core::traits::ArtifactStore;
use threadshape_core::types::ArtifactKey;

use crate::connection::pragmas::verify_wal_mode;
use crate::connection::{apply_pragmas, with_immediate_transaction};
use crate::migrations;
use crate::queries::artifacts::{self, ArtifactRow};

/// Artifact store keeping every artifact as one row of a single SQLite table.
pub struct SqliteArtifactStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteArtifactStore {
    /// Open (or create) a database at the given path, apply pragmas, run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: format!("open {}: {e}", path.display()),
        })?;
        apply_pragmas(&conn)?;
        if !verify_wal_mode(&conn)? {
            tracing::warn!(path = %path.display(), "WAL journal mode unavailable, using the SQLite default");
        }
        migrations::run_migrations(&conn)?;
        let store = Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        };
        let stored = store.list()?;
        tracing::debug!(
            path = %path.display(),
            artifacts = ?stored.iter().map(|row| row.key.as_str()).collect::<Vec<_>>(),
            "opened artifact database"
        );
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Metadata for every stored artifact.
    pub fn list(&self) -> Result<Vec<ArtifactRow>, StorageError> {
        self.with_conn(artifacts::list)
    }

    /// Execute an operation on the single connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(&guard)
    }
}

impl ArtifactStore for SqliteArtifactStore {
    fn put_raw(&self, key: ArtifactKey, bytes: &[u8]) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            with_immediate_transaction(conn, |tx| artifacts::upsert(tx, key.as_str(), bytes, now_secs()))
        })?;
        tracing::debug!(key = %key, bytes = bytes.len(), "stored artifact");
        Ok(())
    }

    fn get_raw(&self, key: ArtifactKey) -> Result<Vec<u8>, StorageError> {
        self.with_conn(|conn| artifacts::select_payload(conn, key.as_str()))?
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    fn contains(&self, key: ArtifactKey) -> Result<bool, StorageError> {
        self.with_conn(|conn| artifacts::exists(conn, key.as_str()))
    }

    fn delete(&self, key: ArtifactKey) -> Result<(), StorageError> {
        self.with_conn(|conn| artifacts::delete(conn, key.as_str()))
    }

    fn put_batch(&self, entries: &[(ArtifactKey, Vec<u8>)]) -> Result<(), StorageError> {
        let updated_at = now_secs();
        self.with_conn(|conn| {
            with_immediate_transaction(conn, |tx| {
                for (key, bytes) in entries {
                    artifacts::upsert(tx, key.as_str(), bytes, updated_at)?;
                }
                Ok(())
            })
        })?;
        tracing::debug!(count = entries.len(), "stored artifact batch");
        Ok(())
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
