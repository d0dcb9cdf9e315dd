//! Storage keys shared with the rest of the storefront.
//!
//! These names are read by other components (the cart in particular) and by
//! previously persisted data, so they must not change.

/// Raw customer access token (`""` when logged out via `set_access_token`).
pub const ACCESS_TOKEN: &str = "accessToken";

/// Duplicate of the access token read by the legacy cart component.
pub const CUSTOMER_ACCESS_TOKEN: &str = "customerAccessToken";

/// JSON-serialized customer profile.
pub const CUSTOMER: &str = "customer";

/// Cart identifier owned by the cart subsystem, cleared on logout.
pub const CART_ID: &str = "cartId";

/// Default namespaced key for the full session snapshot.
pub const DEFAULT_SNAPSHOT: &str = "trottperf-auth";

/// Keys removed by logout, in removal order.
pub const LOGOUT_KEYS: [&str; 4] = [ACCESS_TOKEN, CUSTOMER, CUSTOMER_ACCESS_TOKEN, CART_ID];

/// Whether `key` is one of the fixed per-field keys above.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    LOGOUT_KEYS.contains(&key)
}
