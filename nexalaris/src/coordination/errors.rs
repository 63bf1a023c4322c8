//! Error types for the coordination layer.

use thiserror::Error;

use crate::certs::CertError;
use crate::credentials::CredentialError;
use crate::session::SessionError;
use crate::utils::UtilError;

/// Errors surfaced by the coordination functions. The HTTP layer maps these
/// onto status codes; the variants carry only messages that are safe to show
/// to a client.
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Request-shape error (missing field, malformed value)
    #[error("{0}")]
    Validation(String),

    /// The submitted login password did not verify. Deliberately does not
    /// distinguish "no credential provisioned" from "wrong password".
    #[error("Invalid password")]
    InvalidPassword,

    /// The current password supplied to a password change did not verify
    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    /// Unauthorized access error
    #[error("Unauthorized access")]
    Unauthorized,

    /// The client exhausted its login attempts for the current window
    #[error("Too many login attempts. Please try again later.")]
    RateLimited,

    /// Resource not found with context
    #[error("{0} not found")]
    NotFound(String),

    /// Unique or foreign-key conflict from the certificate store
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Error from session operations
    #[error("Session error: {0}")]
    SessionError(SessionError),
}

// Custom From implementations that automatically log errors

impl From<CredentialError> for CoordinationError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::WrongCurrentPassword => Self::WrongCurrentPassword,
            CredentialError::Hash(msg) | CredentialError::Storage(msg) => {
                tracing::error!("Credential error: {}", msg);
                Self::Database(msg)
            }
        }
    }
}

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        let error = Self::SessionError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<CertError> for CoordinationError {
    fn from(err: CertError) -> Self {
        match err {
            CertError::NotFound => Self::NotFound("Certificate".to_string()),
            CertError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                Self::Conflict(msg)
            }
            CertError::Storage(msg) => {
                tracing::error!("Certificate store error: {}", msg);
                Self::Database(msg)
            }
        }
    }
}

impl From<UtilError> for CoordinationError {
    fn from(err: UtilError) -> Self {
        let msg = err.to_string();
        tracing::error!("Utils error: {}", msg);
        Self::Database(msg)
    }
}
