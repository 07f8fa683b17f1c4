//! Artifact storage errors.

use super::error_code::{self, ThreadshapeErrorCode};

/// Storage-layer errors for artifact persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Artifact not found: {key}")]
    NotFound { key: String },

    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Failed to (de)serialize artifact {key}: {message}")]
    Serialization { key: String, message: String },

    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// Whether this error means the artifact simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl ThreadshapeErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::ARTIFACT_NOT_FOUND,
            Self::Serialization { .. } => error_code::SERIALIZATION_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
