//! Open the artifact store selected by configuration.

use std::path::Path;

use threadshape_core::config::{StorageBackend, StorageConfig};
use threadshape_core::errors::StorageError;
use threadshape_core::traits::ArtifactStore;

use crate::{FileArtifactStore, SqliteArtifactStore};

/// Open the configured backend inside the configured working directory.
pub fn open_store(config: &StorageConfig, root: &Path) -> Result<Box<dyn ArtifactStore>, StorageError> {
    let work_dir = config.effective_work_dir(root);
    std::fs::create_dir_all(&work_dir).map_err(|e| StorageError::Io {
        path: work_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let store: Box<dyn ArtifactStore> = match config.effective_backend() {
        StorageBackend::Sqlite => {
            let db_path = work_dir.join(config.effective_database_file());
            Box::new(SqliteArtifactStore::open(&db_path)?)
        }
        StorageBackend::Files => Box::new(FileArtifactStore::open(&work_dir)?),
    };
    tracing::info!(
        backend = ?config.effective_backend(),
        work_dir = %work_dir.display(),
        "artifact store ready"
    );
    Ok(store)
}
