use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub(crate) enum CertError {
    #[error("Not found")]
    NotFound,

    /// Unique or foreign-key constraint violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CertError {
    /// Map a sqlx error, separating constraint violations from plain storage
    /// faults.
    pub(crate) fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return Self::Conflict(conflict_message.to_string());
            }
        }
        Self::Storage(err.to_string())
    }
}
