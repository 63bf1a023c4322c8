use crate::certs::{
    errors::CertError,
    types::{Certificate, Program},
};
use crate::storage::GENERIC_DATA_STORE;

use super::postgres::*;
use super::sqlite::*;

pub(crate) struct CertStore;

impl CertStore {
    /// Initialize the programs and certificates tables
    pub(crate) async fn init() -> Result<(), CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(CertError::Storage("Unsupported database type".to_string())),
        }
    }

    pub(crate) async fn insert_program(program: &Program) -> Result<(), CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            insert_program_sqlite(pool, program).await
        } else if let Some(pool) = store.as_postgres() {
            insert_program_postgres(pool, program).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Returns false when no program with the given id exists.
    pub(crate) async fn update_program(program: &Program) -> Result<bool, CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            update_program_sqlite(pool, program).await
        } else if let Some(pool) = store.as_postgres() {
            update_program_postgres(pool, program).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Returns false when no program with the given id exists.
    pub(crate) async fn delete_program(id: &str) -> Result<bool, CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            delete_program_sqlite(pool, id).await
        } else if let Some(pool) = store.as_postgres() {
            delete_program_postgres(pool, id).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }

    pub(crate) async fn get_program(id: &str) -> Result<Option<Program>, CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_program_sqlite(pool, id).await
        } else if let Some(pool) = store.as_postgres() {
            get_program_postgres(pool, id).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }

    pub(crate) async fn list_programs() -> Result<Vec<Program>, CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            list_programs_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            list_programs_postgres(pool).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }

    pub(crate) async fn insert_certificate(certificate: &Certificate) -> Result<(), CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            insert_certificate_sqlite(pool, certificate).await
        } else if let Some(pool) = store.as_postgres() {
            insert_certificate_postgres(pool, certificate).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }

    pub(crate) async fn get_certificate_by_code(
        cert_code: &str,
    ) -> Result<Option<Certificate>, CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_certificate_by_code_sqlite(pool, cert_code).await
        } else if let Some(pool) = store.as_postgres() {
            get_certificate_by_code_postgres(pool, cert_code).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }

    pub(crate) async fn list_certificates() -> Result<Vec<Certificate>, CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            list_certificates_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            list_certificates_postgres(pool).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Returns false when no certificate with the given code exists.
    pub(crate) async fn revoke_certificate(cert_code: &str) -> Result<bool, CertError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            revoke_certificate_sqlite(pool, cert_code).await
        } else if let Some(pool) = store.as_postgres() {
            revoke_certificate_postgres(pool, cert_code).await
        } else {
            Err(CertError::Storage("Unsupported database type".to_string()))
        }
    }
}
