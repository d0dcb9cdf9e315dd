//! What the cart subsystem sees of the customer session.
//!
//! The cart needs two things to attach a cart to a buyer: its own cart id and
//! the current customer access token. The cart id lives in storage under
//! [`keys::CART_ID`]; the token is received from the session store through a
//! [`CustomerTokenWatch`] rather than by reading the `customerAccessToken` key,
//! which is only kept up to date for older readers.

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::error::StorageError;
use crate::keys;
use crate::storage::Storage;

/// Receiving side of the store's customer token channel.
///
/// Obtained from [`SessionStore::subscribe`](crate::SessionStore::subscribe).
#[derive(Debug, Clone)]
pub struct CustomerTokenWatch {
    rx: watch::Receiver<Option<SecretString>>,
}

impl CustomerTokenWatch {
    pub(crate) const fn new(rx: watch::Receiver<Option<SecretString>>) -> Self {
        Self { rx }
    }

    /// Current token without marking it as seen.
    #[must_use]
    pub fn current(&self) -> Option<SecretString> {
        self.rx.borrow().clone()
    }

    /// Current token, marking it as seen.
    pub fn take_current(&mut self) -> Option<SecretString> {
        self.rx.borrow_and_update().clone()
    }

    /// Whether the token changed since it was last seen.
    ///
    /// Also true once the store has been dropped, since the cart must then
    /// stop trusting the last value.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(true)
    }
}

/// Buyer identity attached to a cart.
#[derive(Debug, Clone)]
pub struct BuyerIdentity {
    /// Cart id, if a cart exists.
    pub cart_id: Option<String>,
    /// Customer access token, if logged in.
    pub customer_access_token: Option<SecretString>,
}

impl BuyerIdentity {
    /// Whether the cart should be associated with a logged-in customer.
    #[must_use]
    pub fn is_customer(&self) -> bool {
        self.customer_access_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }
}

/// Cart-side handle on the shared storage and the customer token.
#[derive(Debug)]
pub struct CartBuyer<S> {
    storage: S,
    token: CustomerTokenWatch,
}

impl<S: Storage> CartBuyer<S> {
    /// Create a handle from a shared storage backend and a token watch.
    pub const fn new(storage: S, token: CustomerTokenWatch) -> Self {
        Self { storage, token }
    }

    /// Current cart id. An empty stored value counts as no cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn cart_id(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .storage
            .get(keys::CART_ID)?
            .filter(|id| !id.trim().is_empty()))
    }

    /// Remember the cart created for this visitor.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn remember_cart(&self, cart_id: &str) -> Result<(), StorageError> {
        self.storage.set(keys::CART_ID, cart_id)?;
        tracing::debug!(cart_id, "Cart remembered");
        Ok(())
    }

    /// Forget the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn forget_cart(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::CART_ID)
    }

    /// Whether the customer token changed since the last `buyer_identity`.
    #[must_use]
    pub fn token_changed(&self) -> bool {
        self.token.has_changed()
    }

    /// Current buyer identity; marks the token as seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart id cannot be read.
    pub fn buyer_identity(&mut self) -> Result<BuyerIdentity, StorageError> {
        Ok(BuyerIdentity {
            cart_id: self.cart_id()?,
            customer_access_token: self.token.take_current(),
        })
    }
}
