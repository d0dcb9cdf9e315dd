//! Durable key-value storage adapters.
//!
//! The session store only ever needs three synchronous operations on string
//! keys and values. Backends decide how those are made durable:
//!
//! - [`MemoryStorage`] - process-local map, optional byte quota
//! - [`FileStorage`] - one JSON object on disk, rewritten on every change

mod file;
mod memory;

use std::sync::Arc;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// A synchronous string key-value store.
///
/// Implementations use interior mutability so a single backend can be shared
/// (behind an [`Arc`]) between the session store and the cart subsystem.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or full.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
