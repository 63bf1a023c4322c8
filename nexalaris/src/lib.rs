//! nexalaris - Core library for the Nexalaris certificate platform
//!
//! This crate provides the admin authentication subsystem (password
//! verification, sessions, CSRF double-submit defense, login rate limiting)
//! and the certificate/program stores consumed by the HTTP layer.

mod certs;
mod coordination;
mod credentials;
mod ratelimit;
mod session;
mod storage;
mod utils;

#[cfg(test)]
mod test_utils;

pub use coordination::{
    CoordinationError, IssueCertificateRequest, ProgramUpsertRequest, get_public_certificate_core,
    handle_change_password_core, handle_login_core, handle_logout_core, issue_certificate_core,
    list_certificates_core, list_programs_core, revoke_certificate_core, upsert_program_core,
};

pub use certs::{Certificate, CertificateStatus, Program, PublicCertificate};
pub use coordination::delete_program_core;
pub use ratelimit::LoginRateLimiter;
pub use session::{
    CSRF_COOKIE_NAME, CSRF_HEADER_NAME, SESSION_COOKIE_NAME, SessionError, authorize,
    is_authenticated, prepare_logout_response,
};

/// Initialize the stores and provision the admin credential if configured.
///
/// Must be called once at startup before serving requests.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    credentials::init().await?;
    certs::init().await?;
    Ok(())
}
