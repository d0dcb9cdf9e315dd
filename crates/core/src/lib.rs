//! Trott e Perf Core - Shared value types.
//!
//! This crate provides the small value types used across the Trott e Perf
//! storefront components:
//! - `session` - Customer session store (token + profile persistence)
//! - `cli` - Support tooling around the session store
//!
//! # Architecture
//!
//! The core crate contains only types and formatting helpers - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated emails, prices and phone numbers with French
//!   (`fr-FR`) display formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
