//! Coordination layer: the high-level operations the HTTP handlers call.
//!
//! Each function composes the lower modules (credentials, session, rate
//! limiting, certificate store) into one request-shaped operation and maps
//! their errors into [`CoordinationError`], which the route boundary turns
//! into status codes. Handlers stay thin passthroughs.

mod auth;
mod certs;
mod errors;

pub use auth::{handle_change_password_core, handle_login_core, handle_logout_core};

pub use certs::{
    IssueCertificateRequest, ProgramUpsertRequest, delete_program_core, get_public_certificate_core,
    issue_certificate_core, list_certificates_core, list_programs_core, revoke_certificate_core,
    upsert_program_core,
};

pub use errors::CoordinationError;
