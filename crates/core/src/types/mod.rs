//! Core types for Trott e Perf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod phone;
pub mod price;

pub use email::{Email, EmailError};
pub use phone::{PhoneError, PhoneNumber};
pub use price::{CurrencyCode, Price};
