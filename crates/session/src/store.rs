//! The customer session store.
//!
//! [`SessionStore`] is the single source of truth for who the visitor is:
//! the customer access token issued by the commerce backend and the matching
//! customer profile. It is created once by the application root and handed
//! to the components that need it.
//!
//! Every mutation writes through to [`Storage`] synchronously, then rewrites
//! the snapshot used by [`SessionStore::hydrate`]. Storage failures never
//! reach the caller: the in-memory state is updated regardless, the failure
//! is logged and counted in [`SessionStore::write_failures`].

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use trottperf_core::Email;

use crate::cart::CustomerTokenWatch;
use crate::config::{NullCustomerPolicy, SessionConfig};
use crate::customer::CustomerProfile;
use crate::error::StorageError;
use crate::keys;
use crate::snapshot::Snapshot;
use crate::storage::Storage;
use crate::telemetry;

/// Whether a customer is logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No access token.
    Anonymous,
    /// An access token is held.
    Authenticated,
}

/// Customer session state with write-through persistence.
pub struct SessionStore<S> {
    storage: S,
    snapshot_key: String,
    null_customer: NullCustomerPolicy,
    access_token: Option<SecretString>,
    customer: Option<CustomerProfile>,
    token_tx: watch::Sender<Option<SecretString>>,
    write_failures: u64,
}

impl<S: Storage> SessionStore<S> {
    /// Build the store, restoring the last persisted snapshot if any.
    ///
    /// A missing snapshot, an unreadable backend, or a snapshot that fails
    /// to decode all yield an anonymous session.
    pub fn hydrate(storage: S, config: SessionConfig) -> Self {
        let snapshot = match storage.get(&config.snapshot_key) {
            Ok(Some(raw)) => match Snapshot::decode(&raw) {
                Ok(snapshot) => {
                    tracing::debug!(
                        authenticated = snapshot.access_token.is_some(),
                        has_customer = snapshot.customer.is_some(),
                        "Session restored from snapshot"
                    );
                    snapshot
                }
                Err(err) => {
                    tracing::warn!(
                        key = %config.snapshot_key,
                        error = %err,
                        "Discarding unreadable session snapshot"
                    );
                    Snapshot::default()
                }
            },
            Ok(None) => {
                tracing::debug!("No session snapshot, starting anonymous");
                Snapshot::default()
            }
            Err(err) => {
                tracing::warn!(
                    key = %config.snapshot_key,
                    error = %err,
                    "Session storage unreadable, starting anonymous"
                );
                Snapshot::default()
            }
        };

        let access_token = snapshot.access_token.map(SecretString::from);
        let (token_tx, _) = watch::channel(access_token.clone());

        Self {
            storage,
            snapshot_key: config.snapshot_key,
            null_customer: config.null_customer,
            access_token,
            customer: snapshot.customer,
            token_tx,
            write_failures: 0,
        }
    }

    /// Current customer access token.
    #[must_use]
    pub const fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }

    /// Current customer profile.
    #[must_use]
    pub const fn customer(&self) -> Option<&CustomerProfile> {
        self.customer.as_ref()
    }

    /// Whether an access token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Logical session state.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    /// Storage operations that failed since the store was built.
    #[must_use]
    pub const fn write_failures(&self) -> u64 {
        self.write_failures
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Subscribe to customer token changes.
    #[must_use]
    pub fn subscribe(&self) -> CustomerTokenWatch {
        CustomerTokenWatch::new(self.token_tx.subscribe())
    }

    /// Set or clear the customer access token.
    ///
    /// Writes the token (or `""`) under `accessToken`, and mirrors it under
    /// `customerAccessToken`, which is removed when the token is cleared.
    /// Clearing the token leaves the customer profile in place.
    pub fn set_access_token(&mut self, token: Option<&str>) {
        self.write(keys::ACCESS_TOKEN, token.unwrap_or_default());
        match token {
            Some(token) => self.write(keys::CUSTOMER_ACCESS_TOKEN, token),
            None => self.delete(keys::CUSTOMER_ACCESS_TOKEN),
        }

        self.access_token = token.map(SecretString::from);
        self.persist_snapshot();
        self.publish_token();

        if token.is_some() {
            telemetry::add_breadcrumb("session", "Customer access token set", None);
            tracing::info!("Customer logged in");
        } else {
            telemetry::add_breadcrumb("session", "Customer access token cleared", None);
            tracing::info!("Customer access token cleared");
        }
    }

    /// Set or clear the customer profile.
    ///
    /// The profile is stored as JSON under `customer`. Clearing it follows
    /// the configured [`NullCustomerPolicy`].
    pub fn set_customer(&mut self, customer: Option<CustomerProfile>) {
        if !self.is_authenticated() && customer.is_some() {
            tracing::debug!("Customer profile set while no access token is held");
        }

        if customer.is_none() && self.null_customer == NullCustomerPolicy::RemoveKey {
            self.delete(keys::CUSTOMER);
        } else {
            match serde_json::to_string(&customer) {
                Ok(json) => self.write(keys::CUSTOMER, &json),
                Err(err) => {
                    self.write_failures += 1;
                    tracing::warn!(error = %err, "Could not serialize customer profile");
                }
            }
        }

        match &customer {
            Some(profile) => {
                telemetry::set_sentry_customer(profile);
                telemetry::add_breadcrumb(
                    "session",
                    "Customer profile updated",
                    Some(&[("customer_id", profile.id.as_str())]),
                );
                tracing::debug!(
                    customer_id = %profile.id,
                    email = ?profile.email.as_ref().map(Email::masked),
                    "Customer profile updated"
                );
            }
            None => {
                telemetry::clear_sentry_customer();
                tracing::debug!("Customer profile cleared");
            }
        }

        self.customer = customer;
        self.persist_snapshot();
    }

    /// Log the customer out.
    ///
    /// Removes the token, customer, side-channel and cart keys (each
    /// independently), resets the in-memory state and rewrites the snapshot.
    /// Calling it again changes nothing.
    pub fn logout(&mut self) {
        for key in keys::LOGOUT_KEYS {
            self.delete(key);
        }

        let was_authenticated = self.is_authenticated();
        let previous = self.customer.take();
        self.access_token = None;
        self.persist_snapshot();
        self.publish_token();

        telemetry::clear_sentry_customer();
        if was_authenticated {
            let customer_id = previous.as_ref().map(|c| c.id.as_str());
            let data = customer_id.map(|id| [("customer_id", id)]);
            telemetry::add_breadcrumb(
                "session",
                "Customer logged out",
                data.as_ref().map(|d| d.as_slice()),
            );
            tracing::info!(customer_id, "Customer logged out");
        }
    }

    fn persist_snapshot(&mut self) {
        let snapshot = Snapshot {
            access_token: self
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_owned()),
            customer: self.customer.clone(),
        };

        match snapshot.encode() {
            Ok(raw) => {
                let key = self.snapshot_key.clone();
                self.write(&key, &raw);
            }
            Err(err) => {
                self.write_failures += 1;
                tracing::warn!(error = %err, "Could not encode session snapshot");
            }
        }
    }

    /// Notify token watchers, only if the token actually changed.
    fn publish_token(&self) {
        let next = self.access_token.clone();
        self.token_tx.send_if_modified(|current| {
            let changed = current.as_ref().map(|t| t.expose_secret())
                != next.as_ref().map(|t| t.expose_secret());
            if changed {
                *current = next;
            }
            changed
        });
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            self.record_failure("set", key, &err);
        }
    }

    fn delete(&mut self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            self.record_failure("remove", key, &err);
        }
    }

    fn record_failure(&mut self, operation: &'static str, key: &str, err: &StorageError) {
        self.write_failures += 1;
        tracing::warn!(
            operation,
            key,
            error = %err,
            "Session storage write failed, keeping in-memory state only"
        );
    }
}

impl<S> fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("snapshot_key", &self.snapshot_key)
            .field("null_customer", &self.null_customer)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("customer", &self.customer)
            .field("write_failures", &self.write_failures)
            .finish_non_exhaustive()
    }
}
