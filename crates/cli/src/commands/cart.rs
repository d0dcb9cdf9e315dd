//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! tp-session cart set gid://shopify/Cart/abc
//! tp-session cart clear
//! ```

use thiserror::Error;
use trottperf_session::{CartBuyer, Storage, StorageError};

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The cart id given on the command line is blank.
    #[error("Cart id cannot be empty")]
    EmptyCartId,

    /// Storage could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Remember the cart id.
///
/// # Errors
///
/// Returns an error if the id is blank or storage cannot be written.
pub fn set<S: Storage>(cart: &CartBuyer<S>, id: &str) -> Result<(), CartCommandError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CartCommandError::EmptyCartId);
    }
    cart.remember_cart(id)?;
    tracing::info!(cart_id = id, "Cart remembered");
    Ok(())
}

/// Forget the cart id.
///
/// # Errors
///
/// Returns an error if storage cannot be written.
pub fn clear<S: Storage>(cart: &CartBuyer<S>) -> Result<(), CartCommandError> {
    cart.forget_cart()?;
    tracing::info!("Cart forgotten");
    Ok(())
}
