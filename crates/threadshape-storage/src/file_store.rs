//! Directory-backed artifact store: one `<key>.json` file per artifact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use threadshape_core::errors::StorageError;
use threadshape_core::traits::ArtifactStore;
use threadshape_core::types::ArtifactKey;

/// Keeps artifacts as files inside a working directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written artifact.
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: ArtifactKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl ArtifactStore for FileArtifactStore {
    fn put_raw(&self, key: ArtifactKey, bytes: &[u8]) -> Result<(), StorageError> {
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{}.json.tmp", key.as_str()));
        {
            let mut file = fs::File::create(&staging).map_err(|e| io_error(&staging, e))?;
            file.write_all(bytes).map_err(|e| io_error(&staging, e))?;
            file.sync_all().map_err(|e| io_error(&staging, e))?;
        }
        fs::rename(&staging, &target).map_err(|e| io_error(&target, e))?;
        tracing::debug!(key = %key, bytes = bytes.len(), path = %target.display(), "stored artifact");
        Ok(())
    }

    fn get_raw(&self, key: ArtifactKey) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn contains(&self, key: ArtifactKey) -> Result<bool, StorageError> {
        Ok(self.path_for(key).is_file())
    }

    fn delete(&self, key: ArtifactKey) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
