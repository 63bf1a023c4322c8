use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub(crate) enum CredentialError {
    /// The current password supplied to a password change did not verify.
    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<bcrypt::BcryptError> for CredentialError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Hash(err.to_string())
    }
}
