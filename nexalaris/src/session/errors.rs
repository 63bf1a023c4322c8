use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// No session cookie was presented.
    #[error("No session")]
    NoSession,

    /// The session cookie did not match a live server-side record.
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Double-submit verification failed on a state-changing request.
    #[error("CSRF verification failed: {0}")]
    CsrfFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Header error: {0}")]
    HeaderError(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
