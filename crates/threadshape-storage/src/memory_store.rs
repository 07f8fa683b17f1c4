//! In-memory artifact store for tests.

use std::sync::Mutex;

use rustc_hash::FxHashMap;
use threadshape_core::errors::StorageError;
use threadshape_core::traits::ArtifactStore;
use threadshape_core::types::ArtifactKey;

#[derive(Default)]
pub struct MemoryArtifactStore {
    entries: Mutex<FxHashMap<ArtifactKey, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn put_raw(&self, key: ArtifactKey, bytes: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key, bytes.to_vec());
        Ok(())
    }

    fn get_raw(&self, key: ArtifactKey) -> Result<Vec<u8>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.get(&key).cloned().ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })
    }

    fn contains(&self, key: ArtifactKey) -> Result<bool, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.contains_key(&key))
    }

    fn delete(&self, key: ArtifactKey) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.remove(&key);
        Ok(())
    }

    fn put_batch(&self, batch: &[(ArtifactKey, Vec<u8>)]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        for (key, bytes) in batch {
            entries.insert(*key, bytes.clone());
        }
        Ok(())
    }
}
