//! Shared test initialization.
//!
//! Every store-touching test starts by calling [`init_test_environment`]:
//! it loads `.env_test` once (falling back to `.env`) and makes sure the
//! in-memory stores have their tables. Tests that share the global stores
//! run under `#[serial]` and set up their own rows.

use std::sync::Once;

pub(crate) async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });

    ensure_stores_initialized().await;
}

async fn ensure_stores_initialized() {
    use crate::certs::CertStore;
    use crate::credentials::CredentialStore;
    use crate::storage::GENERIC_CACHE_STORE;

    // Touching the cache store forces its LazyLock construction.
    let _ = GENERIC_CACHE_STORE.lock().await;

    if let Err(e) = CredentialStore::init().await {
        eprintln!("Warning: Failed to initialize CredentialStore: {e}");
    }
    if let Err(e) = CertStore::init().await {
        eprintln!("Warning: Failed to initialize CertStore: {e}");
    }
}
