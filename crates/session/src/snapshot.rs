//! Full-session snapshot used to rehydrate the store on start.
//!
//! Stored under the configured snapshot key as
//! `{"state": {"accessToken": ..., "customer": ...}, "version": 0}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::customer::CustomerProfile;

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Errors decoding or encoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not JSON, or not the expected shape.
    #[error("invalid session snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by an incompatible version.
    #[error("unsupported session snapshot version {0}")]
    UnsupportedVersion(u32),
}

/// Persisted session state.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Customer access token, if logged in.
    pub access_token: Option<String>,
    /// Customer profile, if known.
    pub customer: Option<CustomerProfile>,
}

/// Stored state before the customer is checked against [`CustomerProfile`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    customer: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

impl Snapshot {
    /// Serialize inside the versioned envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&Envelope {
            state: self,
            version: SNAPSHOT_VERSION,
        })?)
    }

    /// Parse a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for non-JSON input, a wrong envelope shape, or a
    /// version other than [`SNAPSHOT_VERSION`]. A customer that does not
    /// match [`CustomerProfile`] is dropped on its own; the token is kept.
    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        let envelope: Envelope<StoredState> = serde_json::from_str(raw)?;
        if envelope.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(envelope.version));
        }

        let StoredState {
            access_token,
            customer,
        } = envelope.state;

        let customer = match customer {
            None | Some(Value::Null) => None,
            Some(value) => match serde_json::from_value::<CustomerProfile>(value) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    tracing::warn!(error = %err, "Dropping unreadable customer from session snapshot");
                    None
                }
            },
        };

        Ok(Self {
            access_token,
            customer,
        })
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("customer", &self.customer)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_encode_layout() {
        let snapshot = Snapshot {
            access_token: Some("tok".to_string()),
            customer: Some(CustomerProfile::new("c1")),
        };

        let value: Value = serde_json::from_str(&snapshot.encode().unwrap()).unwrap();
        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["accessToken"], "tok");
        assert_eq!(value["state"]["customer"]["id"], "c1");
    }

    #[test]
    fn test_empty_snapshot_encodes_nulls() {
        let value: Value = serde_json::from_str(&Snapshot::default().encode().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"state": {"accessToken": null, "customer": null}, "version": 0})
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Snapshot::decode("{not json"),
            Err(SnapshotError::Json(_))
        ));
        assert!(matches!(
            Snapshot::decode(r#"{"accessToken": "tok"}"#),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_decode_rejects_other_versions() {
        let raw = r#"{"state": {"accessToken": "tok"}, "version": 3}"#;
        assert!(matches!(
            Snapshot::decode(raw),
            Err(SnapshotError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let snapshot = Snapshot::decode(r#"{"state": {}, "version": 0}"#).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_decode_keeps_token_when_customer_is_unreadable() {
        let raw = r#"{"state": {"accessToken": "tok", "customer": {"id": "c1", "orders": [{"id": "o1", "orderNumber": 1}]}}, "version": 0}"#;
        let snapshot = Snapshot::decode(raw).unwrap();
        assert_eq!(snapshot.access_token.as_deref(), Some("tok"));
        assert!(snapshot.customer.is_none());

        let raw = r#"{"state": {"accessToken": "tok", "customer": "not a profile"}, "version": 0}"#;
        let snapshot = Snapshot::decode(raw).unwrap();
        assert_eq!(snapshot.access_token.as_deref(), Some("tok"));
        assert!(snapshot.customer.is_none());
    }

    #[test]
    fn test_decode_round_trips_customer() {
        let snapshot = Snapshot {
            access_token: None,
            customer: Some(CustomerProfile::new("c1")),
        };
        assert_eq!(Snapshot::decode(&snapshot.encode().unwrap()).unwrap(), snapshot);
    }

    #[test]
    fn test_debug_redacts_token() {
        let snapshot = Snapshot {
            access_token: Some("very-secret-token".to_string()),
            customer: None,
        };
        let debug = format!("{snapshot:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-secret-token"));
    }
}
