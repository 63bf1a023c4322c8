use crate::credentials::{errors::CredentialError, types::AdminCredential};
use crate::storage::GENERIC_DATA_STORE;

use super::postgres::*;
use super::sqlite::*;

pub(crate) struct CredentialStore;

impl CredentialStore {
    /// Initialize the admin_auth table
    pub(crate) async fn init() -> Result<(), CredentialError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(CredentialError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    /// Fetch the singleton credential row, if provisioned.
    pub(crate) async fn get_credential() -> Result<Option<AdminCredential>, CredentialError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_credential_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            get_credential_postgres(pool).await
        } else {
            Err(CredentialError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Insert the singleton row. Provisioning path only.
    pub(crate) async fn insert_credential(password_hash: &str) -> Result<(), CredentialError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            insert_credential_sqlite(pool, password_hash).await
        } else if let Some(pool) = store.as_postgres() {
            insert_credential_postgres(pool, password_hash).await
        } else {
            Err(CredentialError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Remove the singleton row. Only used to exercise the fail-closed path
    /// in tests.
    #[cfg(test)]
    pub(crate) async fn delete_credential() -> Result<(), CredentialError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            super::sqlite::delete_credential_sqlite(pool).await
        } else {
            Err(CredentialError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Overwrite the singleton row's hash, bumping updated_at.
    pub(crate) async fn update_password_hash(password_hash: &str) -> Result<(), CredentialError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            update_password_hash_sqlite(pool, password_hash).await
        } else if let Some(pool) = store.as_postgres() {
            update_password_hash_postgres(pool, password_hash).await
        } else {
            Err(CredentialError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }
}
