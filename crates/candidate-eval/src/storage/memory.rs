use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, StorageError, StoreKey};

/// In-memory store, optionally bounded by a byte quota across all keys.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<StoreKey, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Raw stored payload, for assertions.
    pub fn raw(&self, key: StoreKey) -> Option<String> {
        self.lock().get(&key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StoreKey, String>> {
        // A panic while holding the lock cannot leave a half-written entry behind.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(&key).cloned())
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), StorageError> {
        let mut entries = self.lock();
        if let Some(quota) = self.quota_bytes {
            let used_elsewhere: usize = entries
                .iter()
                .filter(|(stored_key, _)| **stored_key != key)
                .map(|(_, payload)| payload.len())
                .sum();
            let available = quota.saturating_sub(used_elsewhere);
            if value.len() > available {
                return Err(StorageError::QuotaExceeded {
                    key,
                    needed: value.len(),
                    available,
                });
            }
        }
        entries.insert(key, value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_rejects_oversized_write_and_keeps_previous_value() {
        let store = MemoryStore::with_quota(8);
        store.write(StoreKey::Candidates, "[]").expect("fits");

        match store.write(StoreKey::Candidates, "[\"too long\"]") {
            Err(StorageError::QuotaExceeded {
                needed, available, ..
            }) => {
                assert_eq!(needed, 12);
                assert_eq!(available, 8);
            }
            other => panic!("expected quota error, got {other:?}"),
        }
        assert_eq!(store.raw(StoreKey::Candidates).as_deref(), Some("[]"));
    }

    #[test]
    fn quota_counts_other_keys() {
        let store = MemoryStore::with_quota(10);
        store
            .write(StoreKey::PublicationSources, "123456")
            .expect("fits");
        assert!(store.write(StoreKey::Candidates, "12345").is_err());
        assert!(store.write(StoreKey::Candidates, "1234").is_ok());
    }
}
