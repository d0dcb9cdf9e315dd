//! Sentry context for the current customer.
//!
//! All helpers are no-ops when Sentry has not been initialised, so the store
//! can call them unconditionally.

use crate::customer::CustomerProfile;

/// Associate subsequent Sentry events with `customer`.
pub fn set_sentry_customer(customer: &CustomerProfile) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer.id.clone()),
            email: customer.email.as_ref().map(|e| e.as_str().to_owned()),
            ..Default::default()
        }));
    });
}

/// Stop associating Sentry events with a customer.
pub fn clear_sentry_customer() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a session transition.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("session", "Customer logged in", Some(&[("customer_id", "c1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
