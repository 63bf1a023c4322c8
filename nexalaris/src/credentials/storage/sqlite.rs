use sqlx::{Pool, Sqlite};

use crate::credentials::{
    errors::CredentialError,
    types::{AdminCredential, SINGLETON_ID},
};

use super::config::DB_TABLE_ADMIN_AUTH;

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), CredentialError> {
    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id INTEGER PRIMARY KEY,
            password_hash TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| CredentialError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_credential_sqlite(
    pool: &Pool<Sqlite>,
) -> Result<Option<AdminCredential>, CredentialError> {
    // Ensure tables exist before any operations - this is critical for in-memory databases
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query_as::<_, AdminCredential>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE id = ?
        "#
    ))
    .bind(SINGLETON_ID)
    .fetch_optional(pool)
    .await
    .map_err(|e| CredentialError::Storage(e.to_string()))
}

pub(super) async fn insert_credential_sqlite(
    pool: &Pool<Sqlite>,
    password_hash: &str,
) -> Result<(), CredentialError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, password_hash, updated_at)
        VALUES (?, ?, ?)
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

#[cfg(test)]
pub(super) async fn delete_credential_sqlite(pool: &Pool<Sqlite>) -> Result<(), CredentialError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query(&format!("DELETE FROM {table_name} WHERE id = ?"))
        .bind(SINGLETON_ID)
        .execute(pool)
        .await
        .map_err(|e| CredentialError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn update_password_hash_sqlite(
    pool: &Pool<Sqlite>,
    password_hash: &str,
) -> Result<(), CredentialError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ADMIN_AUTH.as_str();

    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET password_hash = ?, updated_at = ? WHERE id = ?
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
