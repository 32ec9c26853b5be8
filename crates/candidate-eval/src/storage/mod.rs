//! Key-value persistence medium for the two whole-collection keys.
//!
//! Every write replaces a full collection snapshot. Callers keep their in-memory copy
//! untouched until `write` has returned `Ok`, which keeps a failed write from leaking
//! partial state.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// The persisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    Candidates,
    PublicationSources,
}

impl StoreKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreKey::Candidates => "candidates",
            StoreKey::PublicationSources => "publicationSources",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage abstraction so registries and repositories can run against a fake.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StorageError>;
    fn write(&self, key: StoreKey, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// The single externally-triggered failure mode of the core.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access `{key}`: {source}")]
    Io {
        key: StoreKey,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored `{key}` is not valid: {source}")]
    Decode {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage quota exceeded writing `{key}` ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: StoreKey,
        needed: usize,
        available: usize,
    },
}

/// Decode a whole collection. `Ok(None)` means the key has never been written.
pub fn load_collection<T, S>(store: &S, key: StoreKey) -> Result<Option<Vec<T>>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.read(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Decode { key, source }),
        None => Ok(None),
    }
}

/// Encode and replace a whole collection.
pub fn save_collection<T, S>(store: &S, key: StoreKey, items: &[T]) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw =
        serde_json::to_string(items).map_err(|source| StorageError::Encode { key, source })?;
    store.write(key, &raw)
}
