mod errors;
mod main;
mod storage;
mod types;

pub(crate) use errors::CredentialError;
pub(crate) use main::{change_admin_password, verify_admin_password};
pub(crate) use storage::CredentialStore;

/// Create the admin_auth table and provision the bootstrap credential when
/// configured. Runtime verification never provisions anything.
pub(crate) async fn init() -> Result<(), CredentialError> {
    CredentialStore::init().await?;
    main::bootstrap_admin_password().await?;
    Ok(())
}
