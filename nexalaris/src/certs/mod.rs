mod errors;
mod storage;
mod types;

pub use types::{Certificate, CertificateStatus, Program, PublicCertificate};

pub(crate) use errors::CertError;
pub(crate) use storage::CertStore;

pub(crate) async fn init() -> Result<(), CertError> {
    CertStore::init().await
}
