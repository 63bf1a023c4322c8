use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::certs::{CertStore, Certificate, CertificateStatus, Program, PublicCertificate};
use crate::utils::gen_random_bytes;

use super::errors::CoordinationError;

/// Payload for issuing a certificate.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCertificateRequest {
    pub holder_name: String,
    #[serde(default)]
    pub holder_email: Option<String>,
    pub program_id: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub achievements_markdown: String,
}

/// Payload for creating or updating a program. An `id` means update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramUpsertRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Mint a certificate code like `VC-2026-3FA2B1`.
fn gen_cert_code(now: DateTime<Utc>) -> Result<String, CoordinationError> {
    let bytes = gen_random_bytes(3)?;
    Ok(format!("VC-{}-{}", now.year(), hex::encode_upper(bytes)))
}

/// Tamper-evidence digest over the issued fields, displayed on the public
/// verification page.
fn compute_signature_hash(
    cert_code: &str,
    holder_name: &str,
    program_id: &str,
    issued_at: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(
        format!(
            "{cert_code}:{holder_name}:{program_id}:{}",
            issued_at.to_rfc3339()
        )
        .as_bytes(),
    );
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// Issue a certificate against an existing program.
///
/// The code is generated in a single attempt; with 24 random bits per year a
/// collision is vanishingly rare and would surface as a conflict error
/// rather than trigger a retry loop.
pub async fn issue_certificate_core(
    request: &IssueCertificateRequest,
) -> Result<Certificate, CoordinationError> {
    if request.holder_name.trim().is_empty() {
        return Err(CoordinationError::Validation(
            "Holder name is required".to_string(),
        ));
    }

    if CertStore::get_program(&request.program_id).await?.is_none() {
        return Err(CoordinationError::NotFound("Program".to_string()));
    }

    let now = Utc::now();
    let cert_code = gen_cert_code(now)?;
    let signature_hash =
        compute_signature_hash(&cert_code, &request.holder_name, &request.program_id, now);

    let certificate = Certificate {
        id: Uuid::new_v4().to_string(),
        cert_code,
        holder_name: request.holder_name.clone(),
        holder_email: request.holder_email.clone(),
        program_id: request.program_id.clone(),
        issued_at: now,
        expires_at: request.expires_at,
        status: CertificateStatus::Valid,
        achievements_markdown: request.achievements_markdown.clone(),
        signature_hash,
        created_at: now,
        updated_at: now,
    };

    CertStore::insert_certificate(&certificate).await?;
    tracing::info!("Issued certificate {}", certificate.cert_code);
    Ok(certificate)
}

/// Mark a certificate revoked. Idempotence is not offered: revoking an
/// unknown code is a not-found error.
pub async fn revoke_certificate_core(cert_code: &str) -> Result<(), CoordinationError> {
    if !CertStore::revoke_certificate(cert_code).await? {
        return Err(CoordinationError::NotFound("Certificate".to_string()));
    }
    tracing::info!("Revoked certificate {cert_code}");
    Ok(())
}

pub async fn list_certificates_core() -> Result<Vec<Certificate>, CoordinationError> {
    Ok(CertStore::list_certificates().await?)
}

/// Public verification lookup: the certificate joined with its program,
/// status adjusted for expiry.
pub async fn get_public_certificate_core(
    cert_code: &str,
) -> Result<PublicCertificate, CoordinationError> {
    let Some(certificate) = CertStore::get_certificate_by_code(cert_code).await? else {
        return Err(CoordinationError::NotFound("Certificate".to_string()));
    };

    let Some(program) = CertStore::get_program(&certificate.program_id).await? else {
        // Unreachable while the foreign key holds.
        return Err(CoordinationError::Database(format!(
            "Certificate {cert_code} references a missing program"
        )));
    };

    Ok(PublicCertificate::from_parts(certificate, program))
}

pub async fn list_programs_core() -> Result<Vec<Program>, CoordinationError> {
    Ok(CertStore::list_programs().await?)
}

/// Create a program, or update one when the request carries an id.
pub async fn upsert_program_core(
    request: &ProgramUpsertRequest,
) -> Result<Program, CoordinationError> {
    if request.name.trim().is_empty() || request.slug.trim().is_empty() {
        return Err(CoordinationError::Validation(
            "Name and slug are required".to_string(),
        ));
    }

    let now = Utc::now();
    match &request.id {
        Some(id) => {
            let Some(existing) = CertStore::get_program(id).await? else {
                return Err(CoordinationError::NotFound("Program".to_string()));
            };
            let program = Program {
                id: existing.id,
                name: request.name.clone(),
                slug: request.slug.clone(),
                description: request.description.clone(),
                image_url: request.image_url.clone(),
                created_at: existing.created_at,
                updated_at: now,
            };
            if !CertStore::update_program(&program).await? {
                return Err(CoordinationError::NotFound("Program".to_string()));
            }
            Ok(program)
        }
        None => {
            let program = Program {
                id: Uuid::new_v4().to_string(),
                name: request.name.clone(),
                slug: request.slug.clone(),
                description: request.description.clone(),
                image_url: request.image_url.clone(),
                created_at: now,
                updated_at: now,
            };
            CertStore::insert_program(&program).await?;
            Ok(program)
        }
    }
}

/// Delete a program. Fails with a conflict while certificates reference it.
pub async fn delete_program_core(id: &str) -> Result<(), CoordinationError> {
    if !CertStore::delete_program(id).await? {
        return Err(CoordinationError::NotFound("Program".to_string()));
    }
    Ok(())
}
