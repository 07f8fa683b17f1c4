//! ArtifactStore trait and typed JSON helpers.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::StorageError;
use crate::types::ArtifactKey;

/// Durable keyed persistence of pipeline outputs. Single writer, last write wins.
pub trait ArtifactStore {
    /// Persist `bytes` under `key`, replacing any previous value.
    fn put_raw(&self, key: ArtifactKey, bytes: &[u8]) -> Result<(), StorageError>;

    /// The exact bytes last stored under `key`, or `StorageError::NotFound`.
    fn get_raw(&self, key: ArtifactKey) -> Result<Vec<u8>, StorageError>;

    fn contains(&self, key: ArtifactKey) -> Result<bool, StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: ArtifactKey) -> Result<(), StorageError>;

    /// Persist several artifacts. Backends with transactions write all or none;
    /// the default writes in order and stops at the first failure.
    fn put_batch(&self, entries: &[(ArtifactKey, Vec<u8>)]) -> Result<(), StorageError> {
        for (key, bytes) in entries {
            self.put_raw(*key, bytes)?;
        }
        Ok(())
    }
}

/// Typed access on top of any [`ArtifactStore`], encoding values as JSON.
pub trait ArtifactStoreExt: ArtifactStore {
    fn put<T: Serialize + ?Sized>(&self, key: ArtifactKey, value: &T) -> Result<(), StorageError> {
        let bytes = encode(key, value)?;
        self.put_raw(key, &bytes)
    }

    fn get<T: DeserializeOwned>(&self, key: ArtifactKey) -> Result<T, StorageError> {
        let bytes = self.get_raw(key)?;
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// True when every key is present.
    fn contains_all(&self, keys: &[ArtifactKey]) -> Result<bool, StorageError> {
        for key in keys {
            if !self.contains(*key)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<S: ArtifactStore + ?Sized> ArtifactStoreExt for S {}

/// Serialize one artifact value to its stored JSON representation.
pub fn encode<T: Serialize + ?Sized>(key: ArtifactKey, value: &T) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(value).map_err(|e| StorageError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })
}
