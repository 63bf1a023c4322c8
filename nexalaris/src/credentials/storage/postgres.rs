use sqlx::{Pool, Postgres};

use crate::credentials::{
    errors::CredentialError,
    types::{AdminCredential, SINGLETON_ID},
};

use super::config::DB_TABLE_ADMIN_AUTH;

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), CredentialError> {
    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGINT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| CredentialError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_credential_postgres(
    pool: &Pool<Postgres>,
) -> Result<Option<AdminCredential>, CredentialError> {
    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query_as::<_, AdminCredential>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE id = $1
        "#
    ))
    .bind(SINGLETON_ID)
    .fetch_optional(pool)
    .await
    .map_err(|e| CredentialError::Storage(e.to_string()))
}

pub(super) async fn insert_credential_postgres(
    pool: &Pool<Postgres>,
    password_hash: &str,
) -> Result<(), CredentialError> {
    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, password_hash, updated_at)
        VALUES ($1, $2, $3)
        "#
    ))
    .bind(SINGLETON_ID)
    .bind(password_hash)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .map_err(|e| CredentialError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn update_password_hash_postgres(
    pool: &Pool<Postgres>,
    password_hash: &str,
) -> Result<(), CredentialError> {
    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET password_hash = $1, updated_at = $2 WHERE id = $3
        "#
    ))
    .bind(password_hash)
    .bind(chrono::Utc::now())
    .bind(SINGLETON_ID)
    .execute(pool)
    .await
    .map_err(|e| CredentialError::Storage(e.to_string()))?;

    Ok(())
}
