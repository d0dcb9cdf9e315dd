//! Storage error types.

use thiserror::Error;

/// Errors raised by a [`Storage`](crate::storage::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refuses all access (disabled, private mode, locked).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Writing the value would exceed the backend's quota.
    #[error("storage quota exceeded writing '{key}' (limit {limit} bytes)")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Quota in bytes.
        limit: usize,
    },

    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}
