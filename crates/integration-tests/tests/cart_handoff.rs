//! Sharing one storage backend between the session store and the cart.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::ExposeSecret;
use trottperf_integration_tests::{TestStorageDir, sample_customer};
use trottperf_session::{CartBuyer, FileStorage, SessionStore, Storage, keys};

#[test]
fn test_cart_sees_login_and_logout() {
    let dir = TestStorageDir::new();
    let storage = Arc::new(FileStorage::open(dir.storage_path()).unwrap());
    let mut store = SessionStore::hydrate(Arc::clone(&storage), dir.config());
    let mut cart = CartBuyer::new(Arc::clone(&storage), store.subscribe());

    cart.remember_cart("gid://shopify/Cart/9").unwrap();
    let guest = cart.buyer_identity().unwrap();
    assert!(!guest.is_customer());
    assert_eq!(guest.cart_id.as_deref(), Some("gid://shopify/Cart/9"));

    store.set_access_token(Some("tok123"));
    store.set_customer(Some(sample_customer()));
    assert!(cart.token_changed());

    let customer = cart.buyer_identity().unwrap();
    assert!(customer.is_customer());
    assert_eq!(
        customer.customer_access_token.unwrap().expose_secret(),
        "tok123"
    );

    store.logout();
    assert!(cart.token_changed());
    let after = cart.buyer_identity().unwrap();
    assert!(!after.is_customer());
    assert_eq!(after.cart_id, None);
}

#[test]
fn test_legacy_key_matches_channel() {
    let dir = TestStorageDir::new();
    let storage = Arc::new(FileStorage::open(dir.storage_path()).unwrap());
    let mut store = SessionStore::hydrate(Arc::clone(&storage), dir.config());
    let watch = store.subscribe();

    store.set_access_token(Some("tok-a"));
    assert_eq!(
        storage.get(keys::CUSTOMER_ACCESS_TOKEN).unwrap().as_deref(),
        Some("tok-a")
    );
    assert_eq!(watch.current().unwrap().expose_secret(), "tok-a");

    store.set_access_token(Some("tok-b"));
    assert_eq!(
        storage.get(keys::CUSTOMER_ACCESS_TOKEN).unwrap().as_deref(),
        Some("tok-b")
    );
    assert_eq!(watch.current().unwrap().expose_secret(), "tok-b");
}

#[test]
fn test_hydrated_store_publishes_restored_token() {
    let dir = TestStorageDir::new();
    {
        let storage = FileStorage::open(dir.storage_path()).unwrap();
        let mut store = SessionStore::hydrate(storage, dir.config());
        store.set_access_token(Some("tok123"));
    }

    let storage = Arc::new(FileStorage::open(dir.storage_path()).unwrap());
    let store = SessionStore::hydrate(Arc::clone(&storage), dir.config());
    let mut cart = CartBuyer::new(storage, store.subscribe());

    let identity = cart.buyer_identity().unwrap();
    assert_eq!(
        identity.customer_access_token.unwrap().expose_secret(),
        "tok123"
    );
}
