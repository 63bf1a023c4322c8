use sqlx::{Pool, Postgres};

use crate::certs::{
    errors::CertError,
    types::{Certificate, Program},
};

use super::config::{DB_TABLE_CERTIFICATES, DB_TABLE_PROGRAMS};

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), CertError> {
    let programs_table = DB_TABLE_PROGRAMS.as_str();
    let certificates_table = DB_TABLE_CERTIFICATES.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {programs_table} (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            image_url TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| CertError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {certificates_table} (
            id TEXT PRIMARY KEY,
            cert_code TEXT NOT NULL UNIQUE,
            holder_name TEXT NOT NULL,
            holder_email TEXT,
            program_id TEXT NOT NULL REFERENCES {programs_table}(id),
            issued_at TIMESTAMPTZ NOT NULL,
            expires_at TIMESTAMPTZ,
            status TEXT NOT NULL,
            achievements_markdown TEXT NOT NULL,
            signature_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| CertError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn insert_program_postgres(
    pool: &Pool<Postgres>,
    program: &Program,
) -> Result<(), CertError> {
    let table_name = DB_TABLE_PROGRAMS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, name, slug, description, image_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#
    ))
    .bind(&program.id)
    .bind(&program.name)
    .bind(&program.slug)
    .bind(&program.description)
    .bind(&program.image_url)
    .bind(program.created_at)
    .bind(program.updated_at)
    .execute(pool)
    .await
    .map_err(|e| CertError::from_sqlx(e, "A program with this slug already exists"))?;

    Ok(())
}

pub(super) async fn update_program_postgres(
    pool: &Pool<Postgres>,
    program: &Program,
) -> Result<bool, CertError> {
    let table_name = DB_TABLE_PROGRAMS.as_str();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name}
        SET name = $1, slug = $2, description = $3, image_url = $4, updated_at = $5
        WHERE id = $6
        "#
    ))
    .bind(&program.name)
    .bind(&program.slug)
    .bind(&program.description)
    .bind(&program.image_url)
    .bind(program.updated_at)
    .bind(&program.id)
    .execute(pool)
    .await
    .map_err(|e| CertError::from_sqlx(e, "A program with this slug already exists"))?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn delete_program_postgres(
    pool: &Pool<Postgres>,
    id: &str,
) -> Result<bool, CertError> {
    let table_name = DB_TABLE_PROGRAMS.as_str();

    let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| CertError::from_sqlx(e, "Cannot delete program with existing certificates"))?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn get_program_postgres(
    pool: &Pool<Postgres>,
    id: &str,
) -> Result<Option<Program>, CertError> {
    let table_name = DB_TABLE_PROGRAMS.as_str();

    sqlx::query_as::<_, Program>(&format!("SELECT * FROM {table_name} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| CertError::Storage(e.to_string()))
}

pub(super) async fn list_programs_postgres(
    pool: &Pool<Postgres>,
) -> Result<Vec<Program>, CertError> {
    let table_name = DB_TABLE_PROGRAMS.as_str();

    sqlx::query_as::<_, Program>(&format!("SELECT * FROM {table_name} ORDER BY name ASC"))
        .fetch_all(pool)
        .await
        .map_err(|e| CertError::Storage(e.to_string()))
}

pub(super) async fn insert_certificate_postgres(
    pool: &Pool<Postgres>,
    certificate: &Certificate,
) -> Result<(), CertError> {
    let table_name = DB_TABLE_CERTIFICATES.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name}
            (id, cert_code, holder_name, holder_email, program_id, issued_at, expires_at,
             status, achievements_markdown, signature_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#
    ))
    .bind(&certificate.id)
    .bind(&certificate.cert_code)
    .bind(&certificate.holder_name)
    .bind(&certificate.holder_email)
    .bind(&certificate.program_id)
    .bind(certificate.issued_at)
    .bind(certificate.expires_at)
    .bind(certificate.status.as_str())
    .bind(&certificate.achievements_markdown)
    .bind(&certificate.signature_hash)
    .bind(certificate.created_at)
    .bind(certificate.updated_at)
    .execute(pool)
    .await
    .map_err(|e| CertError::from_sqlx(e, "Certificate code or program conflict"))?;

    Ok(())
}

pub(super) async fn get_certificate_by_code_postgres(
    pool: &Pool<Postgres>,
    cert_code: &str,
) -> Result<Option<Certificate>, CertError> {
    let table_name = DB_TABLE_CERTIFICATES.as_str();

    sqlx::query_as::<_, Certificate>(&format!(
        "SELECT * FROM {table_name} WHERE cert_code = $1"
    ))
    .bind(cert_code)
    .fetch_optional(pool)
    .await
    .map_err(|e| CertError::Storage(e.to_string()))
}

pub(super) async fn list_certificates_postgres(
    pool: &Pool<Postgres>,
) -> Result<Vec<Certificate>, CertError> {
    let table_name = DB_TABLE_CERTIFICATES.as_str();

    sqlx::query_as::<_, Certificate>(&format!(
        "SELECT * FROM {table_name} ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| CertError::Storage(e.to_string()))
}

pub(super) async fn revoke_certificate_postgres(
    pool: &Pool<Postgres>,
    cert_code: &str,
) -> Result<bool, CertError> {
    let table_name = DB_TABLE_CERTIFICATES.as_str();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET status = 'REVOKED', updated_at = $1 WHERE cert_code = $2
        "#
    ))
    .bind(chrono::Utc::now())
    .bind(cert_code)
    .execute(pool)
    .await
    .map_err(|e| CertError::Storage(e.to_string()))?;

    Ok(result.rows_affected() > 0)
}
