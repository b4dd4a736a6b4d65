//! Key-value persistence for storefront state.
//!
//! Catalog, cart and profile data are small, schema-less documents stored
//! under well-known keys (see [`keys`]). Backends only move strings around;
//! [`Storage`] layers typed, JSON-encoded access on top through
//! [`StorageKey`], so every key carries the type stored under it.
//!
//! # Backends
//!
//! - [`MemoryBackend`] - process-local, lost on exit (default when no
//!   storage path is configured)
//! - [`JsonFileBackend`] - a single JSON object file, rewritten on every write

mod file;
pub mod keys;
mod memory;

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Errors raised by storage backends or while encoding stored values.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized for storage.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value does not match the type expected for its key.
    #[error("failed to decode value for key '{key}': {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A previous writer panicked while holding the backend lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Raw string storage.
///
/// Implementations use interior mutability so one backend can be shared by
/// every store through [`Storage`].
pub trait KeyValueBackend: Send + Sync {
    /// Get the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A storage key bound to the type of value stored under it.
pub struct StorageKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StorageKey<T> {
    /// Declare a key.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The raw key name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StorageKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StorageKey<T> {}

impl<T> std::fmt::Debug for StorageKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StorageKey").field(&self.name).finish()
    }
}

/// Typed handle over a shared [`KeyValueBackend`].
///
/// Cheap to clone; all clones see the same backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueBackend>,
}

impl Storage {
    /// Wrap a backend.
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Storage that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Storage backed by the JSON file at `path`, created on first write.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if an existing file cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Ok(Self::new(JsonFileBackend::open(path)?))
    }

    /// Read and decode the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Decode`] if the stored value is not a valid `T`,
    /// or a backend error.
    pub fn read<T: DeserializeOwned>(&self, key: StorageKey<T>) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.backend.get(key.name)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: key.name,
                source,
            })
    }

    /// Encode and store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Encode`] if `value` cannot be serialized, or a
    /// backend error.
    pub fn write<T: Serialize>(&self, key: StorageKey<T>, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.name,
            source,
        })?;
        self.backend.set(key.name, raw)
    }

    /// Remove the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the removal cannot be persisted.
    pub fn remove<T>(&self, key: StorageKey<T>) -> Result<(), StorageError> {
        self.backend.remove(key.name)
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const COUNT: StorageKey<u32> = StorageKey::new("count");
    const NAMES: StorageKey<Vec<String>> = StorageKey::new("names");

    #[test]
    fn test_read_missing_key_is_none() {
        let storage = Storage::in_memory();
        assert_eq!(storage.read(COUNT).unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let storage = Storage::in_memory();
        storage
            .write(NAMES, &vec!["Glass Scrap".to_string()])
            .unwrap();
        assert_eq!(
            storage.read(NAMES).unwrap(),
            Some(vec!["Glass Scrap".to_string()])
        );
    }

    #[test]
    fn test_clones_share_backend() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.write(COUNT, &3).unwrap();
        assert_eq!(other.read(COUNT).unwrap(), Some(3));

        other.remove(COUNT).unwrap();
        assert_eq!(storage.read(COUNT).unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_is_decode_error() {
        let storage = Storage::in_memory();
        storage.write(NAMES, &vec!["x".to_string()]).unwrap();

        let mismatched: StorageKey<u32> = StorageKey::new("names");
        let err = storage.read(mismatched).unwrap_err();
        assert!(matches!(err, StorageError::Decode { key: "names", .. }));
    }
}
