//! Trott e Perf customer session store.
//!
//! Holds the customer access token issued by the commerce backend and the
//! authenticated customer profile, writes both through to durable key-value
//! storage, and rehydrates them on start.
//!
//! # Architecture
//!
//! - [`storage`] - Key-value storage adapters (in-memory, JSON file)
//! - [`store`] - The [`SessionStore`] state container
//! - [`snapshot`] - The namespaced snapshot used for rehydration
//! - [`cart`] - What the cart subsystem sees of the session
//!
//! # Example
//!
//! ```rust,ignore
//! use trottperf_session::{MemoryStorage, SessionConfig, SessionStore};
//!
//! let mut store = SessionStore::hydrate(MemoryStorage::new(), SessionConfig::default());
//! store.set_access_token(Some("token-from-backend"));
//! assert!(store.is_authenticated());
//! store.logout();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod customer;
pub mod error;
pub mod keys;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use cart::{BuyerIdentity, CartBuyer, CustomerTokenWatch};
pub use config::{ConfigError, NullCustomerPolicy, SessionConfig};
pub use customer::{Address, CustomerProfile, OrderReference};
pub use error::StorageError;
pub use snapshot::{Snapshot, SnapshotError};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{SessionStatus, SessionStore};
