//! Integration tests for the Trott e Perf session store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p trottperf-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_persistence` - Store behavior across reloads with the JSON file backend
//! - `cart_handoff` - Sharing one backend between the store and the cart
//!
//! This library only holds the fixtures shared by those tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;
use trottperf_session::{CustomerProfile, SessionConfig};

/// A scratch directory holding one storage file, removed on drop.
pub struct TestStorageDir {
    dir: TempDir,
}

impl TestStorageDir {
    /// Create a new scratch directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Path of the storage file inside the directory.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// Default configuration pointing at this directory.
    #[must_use]
    pub fn config(&self) -> SessionConfig {
        SessionConfig {
            storage_path: self.storage_path(),
            ..SessionConfig::default()
        }
    }
}

impl Default for TestStorageDir {
    fn default() -> Self {
        Self::new()
    }
}

/// A customer as returned by the backend after login.
///
/// # Panics
///
/// Panics if the fixture no longer matches the profile shape.
#[must_use]
#[allow(clippy::expect_used)]
pub fn sample_customer() -> CustomerProfile {
    serde_json::from_value(json!({
        "id": "gid://shopify/Customer/1001",
        "firstName": "Léa",
        "lastName": "Martin",
        "email": "lea@trottperf.fr",
        "phone": "+33612345678",
        "acceptsMarketing": true,
        "defaultAddress": {
            "id": "gid://shopify/MailingAddress/1",
            "address1": "12 rue des Lilas",
            "city": "Lyon",
            "zip": "69003",
            "country": "France",
            "countryCode": "FR"
        },
        "orders": [{
            "id": "gid://shopify/Order/5001",
            "orderNumber": 1042,
            "processedAt": "2026-03-14T10:30:00Z",
            "totalPrice": {"amount": "1299.00", "currencyCode": "EUR"}
        }]
    }))
    .expect("sample customer fixture should deserialize")
}
