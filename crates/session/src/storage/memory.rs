//! In-memory storage backend.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::Storage;
use crate::error::StorageError;

/// Process-local storage.
///
/// Optionally enforces a byte quota (sum of key and value lengths) the way
/// browser storage does, and can be switched to an unavailable state. Both
/// exist so failure paths can be exercised without a real backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

impl Inner {
    fn usage_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl MemoryStorage {
    /// Create an empty, unlimited storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage that rejects writes beyond `limit` bytes.
    #[must_use]
    pub fn with_quota(limit: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                quota: Some(limit),
                ..Inner::default()
            }),
        }
    }

    /// Make every subsequent call fail with [`StorageError::Unavailable`]
    /// (or succeed again with `false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unavailable = unavailable;
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().entries.keys().cloned().collect()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.lock();
        if inner.unavailable {
            return Err(StorageError::Unavailable("memory storage disabled".to_string()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        if inner.unavailable {
            return Err(StorageError::Unavailable("memory storage disabled".to_string()));
        }
        if let Some(limit) = inner.quota
            && inner.usage_without(key) + key.len() + value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
                limit,
            });
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        if inner.unavailable {
            return Err(StorageError::Unavailable("memory storage disabled".to_string()));
        }
        inner.entries.remove(key);
        Ok(())
    }
}
