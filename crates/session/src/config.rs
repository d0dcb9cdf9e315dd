//! Session store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TROTTPERF_STORAGE_PATH` - JSON storage file (default: `.trottperf/session.json`)
//! - `TROTTPERF_SNAPSHOT_KEY` - Snapshot key (default: `trottperf-auth`)
//! - `TROTTPERF_NULL_CUSTOMER` - `persist-null` (default) or `remove-key`

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::keys;

const DEFAULT_STORAGE_PATH: &str = ".trottperf/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What `set_customer(None)` does to the `customer` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullCustomerPolicy {
    /// Write the literal JSON `null` (what existing readers expect).
    #[default]
    PersistNull,
    /// Delete the key, mirroring `set_access_token(None)` on the side-channel key.
    RemoveKey,
}

impl fmt::Display for NullCustomerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersistNull => f.write_str("persist-null"),
            Self::RemoveKey => f.write_str("remove-key"),
        }
    }
}

impl FromStr for NullCustomerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "persist-null" => Ok(Self::PersistNull),
            "remove-key" => Ok(Self::RemoveKey),
            other => Err(format!(
                "expected 'persist-null' or 'remove-key', got '{other}'"
            )),
        }
    }
}

/// Session store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// File used by the JSON file storage backend
    pub storage_path: PathBuf,
    /// Key holding the full session snapshot
    pub snapshot_key: String,
    /// Handling of a cleared customer profile
    pub null_customer: NullCustomerPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            snapshot_key: keys::DEFAULT_SNAPSHOT.to_string(),
            null_customer: NullCustomerPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_path = lookup("TROTTPERF_STORAGE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.storage_path, PathBuf::from);

        let snapshot_key = match lookup("TROTTPERF_SNAPSHOT_KEY") {
            Some(key) => validate_snapshot_key(key.trim(), "TROTTPERF_SNAPSHOT_KEY")?,
            None => defaults.snapshot_key,
        };

        let null_customer = match lookup("TROTTPERF_NULL_CUSTOMER") {
            Some(value) => value.parse::<NullCustomerPolicy>().map_err(|e| {
                ConfigError::InvalidEnvVar("TROTTPERF_NULL_CUSTOMER".to_string(), e)
            })?,
            None => defaults.null_customer,
        };

        Ok(Self {
            storage_path,
            snapshot_key,
            null_customer,
        })
    }

    /// Override the snapshot key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or collides with a per-field key.
    pub fn with_snapshot_key(mut self, key: &str) -> Result<Self, ConfigError> {
        self.snapshot_key = validate_snapshot_key(key, "snapshot_key")?;
        Ok(self)
    }

    /// Override the null customer policy.
    #[must_use]
    pub const fn with_null_customer(mut self, policy: NullCustomerPolicy) -> Self {
        self.null_customer = policy;
        self
    }
}

/// The snapshot key must be non-empty and distinct from the per-field keys.
fn validate_snapshot_key(key: &str, var_name: &str) -> Result<String, ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }
    if keys::is_reserved(key) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("'{key}' is already used for a session field"),
        ));
    }
    Ok(key.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SessionConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.snapshot_key, "trottperf-auth");
        assert_eq!(config.null_customer, NullCustomerPolicy::PersistNull);
    }

    #[test]
    fn test_overrides() {
        let config = SessionConfig::from_lookup(lookup_from(&[
            ("TROTTPERF_STORAGE_PATH", "/tmp/tp.json"),
            ("TROTTPERF_SNAPSHOT_KEY", "tp:session"),
            ("TROTTPERF_NULL_CUSTOMER", "Remove-Key"),
        ]))
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/tp.json"));
        assert_eq!(config.snapshot_key, "tp:session");
        assert_eq!(config.null_customer, NullCustomerPolicy::RemoveKey);
    }

    #[test]
    fn test_blank_storage_path_uses_default() {
        let config =
            SessionConfig::from_lookup(lookup_from(&[("TROTTPERF_STORAGE_PATH", "  ")])).unwrap();
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
    }

    #[test]
    fn test_invalid_null_customer_policy() {
        let err = SessionConfig::from_lookup(lookup_from(&[("TROTTPERF_NULL_CUSTOMER", "drop")]))
            .unwrap_err();
        assert!(err.to_string().contains("TROTTPERF_NULL_CUSTOMER"));
    }

    #[test]
    fn test_snapshot_key_cannot_shadow_field_keys() {
        let result =
            SessionConfig::from_lookup(lookup_from(&[("TROTTPERF_SNAPSHOT_KEY", "customer")]));
        assert!(result.is_err());

        let result = SessionConfig::default().with_snapshot_key("");
        assert!(result.is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [NullCustomerPolicy::PersistNull, NullCustomerPolicy::RemoveKey] {
            assert_eq!(policy.to_string().parse::<NullCustomerPolicy>().unwrap(), policy);
        }
    }
}
