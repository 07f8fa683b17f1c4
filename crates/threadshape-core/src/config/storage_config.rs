//! Artifact storage configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which artifact store backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Files,
}

/// Configuration for artifact persistence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Working directory holding artifacts. Default: "data".
    pub work_dir: Option<PathBuf>,
    /// Backend. Default: sqlite.
    pub backend: Option<StorageBackend>,
    /// SQLite database file name inside `work_dir`. Default: "artifacts.db".
    pub database_file: Option<String>,
}

impl StorageConfig {
    pub fn effective_work_dir(&self, root: &Path) -> PathBuf {
        match &self.work_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => root.join("data"),
        }
    }

    pub fn effective_backend(&self) -> StorageBackend {
        self.backend.unwrap_or_default()
    }

    pub fn effective_database_file(&self) -> &str {
        self.database_file.as_deref().unwrap_or("artifacts.db")
    }
}
