//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! tp-session login --token <TOKEN>
//! tp-session customer --file customer.json
//! tp-session customer --clear
//! tp-session show
//! tp-session logout
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use trottperf_session::{CartBuyer, CustomerProfile, SessionStatus, SessionStore, Storage, StorageError};

/// Errors that can occur during session commands.
#[derive(Debug, Error)]
pub enum SessionCommandError {
    /// The token given on the command line is blank.
    #[error("Access token cannot be empty")]
    EmptyToken,

    /// The customer file could not be read.
    #[error("Cannot read {path}: {source}")]
    ReadCustomer {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The customer file is not a customer profile.
    #[error("Invalid customer profile in {path}: {source}")]
    InvalidCustomer {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Storage could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Store a customer access token.
///
/// # Errors
///
/// Returns an error if the token is blank.
pub fn login<S: Storage>(store: &mut SessionStore<S>, token: &str) -> Result<(), SessionCommandError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SessionCommandError::EmptyToken);
    }
    store.set_access_token(Some(token));
    tracing::info!("Access token stored");
    Ok(())
}

/// Store the customer profile read from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a customer profile.
pub fn set_customer_from_file<S: Storage>(
    store: &mut SessionStore<S>,
    path: &Path,
) -> Result<(), SessionCommandError> {
    let raw = fs::read_to_string(path).map_err(|source| SessionCommandError::ReadCustomer {
        path: path.to_owned(),
        source,
    })?;
    let customer: CustomerProfile =
        serde_json::from_str(&raw).map_err(|source| SessionCommandError::InvalidCustomer {
            path: path.to_owned(),
            source,
        })?;

    if !store.is_authenticated() {
        tracing::warn!("Storing a customer profile without an access token");
    }

    tracing::info!(customer_id = %customer.id, "Customer profile stored");
    store.set_customer(Some(customer));
    Ok(())
}

/// Clear the customer profile.
pub fn clear_customer<S: Storage>(store: &mut SessionStore<S>) {
    store.set_customer(None);
    tracing::info!("Customer profile cleared");
}

/// Log the customer out.
pub fn logout<S: Storage>(store: &mut SessionStore<S>) {
    store.logout();
}

/// Print the session summary to stdout.
///
/// # Errors
///
/// Returns an error if the cart id cannot be read.
pub fn show<S: Storage, C: Storage>(
    store: &SessionStore<S>,
    cart: &mut CartBuyer<C>,
) -> Result<(), SessionCommandError> {
    let summary = SessionSummary::collect(store, cart)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{summary}");
    }
    Ok(())
}

/// Human-readable view of the session. Never includes the token.
#[derive(Debug)]
pub struct SessionSummary {
    status: SessionStatus,
    customer: Option<CustomerProfile>,
    cart_id: Option<String>,
    cart_linked_to_customer: bool,
}

impl SessionSummary {
    /// Gather the summary from the store and the cart handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart id cannot be read.
    pub fn collect<S: Storage, C: Storage>(
        store: &SessionStore<S>,
        cart: &mut CartBuyer<C>,
    ) -> Result<Self, SessionCommandError> {
        let identity = cart.buyer_identity()?;
        Ok(Self {
            status: store.status(),
            customer: store.customer().cloned(),
            cart_linked_to_customer: identity.is_customer(),
            cart_id: identity.cart_id,
        })
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            SessionStatus::Authenticated => "authenticated",
            SessionStatus::Anonymous => "anonymous",
        };
        writeln!(f, "Status:   {status}")?;

        match &self.customer {
            Some(customer) => {
                write!(f, "Customer: {}", customer.display_name())?;
                if let Some(email) = &customer.email {
                    write!(f, " <{email}>")?;
                }
                writeln!(f)?;
                if let Some(phone) = customer.phone_display() {
                    writeln!(f, "Phone:    {phone}")?;
                }
                if let Some(address) = &customer.default_address {
                    writeln!(f, "Address:  {}", address.formatted_single_line())?;
                }
                write!(f, "Orders:   {}", customer.order_count())?;
                if let Some(last) = customer.orders.first() {
                    write!(f, " (last #{}", last.order_number)?;
                    if let Some(total) = &last.total_price {
                        write!(f, ", {}", total.display_fr())?;
                    }
                    write!(f, ")")?;
                }
                writeln!(f)?;
            }
            None => writeln!(f, "Customer: none")?,
        }

        match &self.cart_id {
            Some(id) if self.cart_linked_to_customer => write!(f, "Cart:     {id} (customer)"),
            Some(id) => write!(f, "Cart:     {id} (guest)"),
            None => write!(f, "Cart:     none"),
        }
    }
}
