use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Certificate status as persisted. A certificate past its expiry is
/// reported as `Expired` dynamically; the row itself keeps its stored
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateStatus {
    #[serde(rename = "VALID")]
    Valid,
    #[serde(rename = "REVOKED")]
    Revoked,
    #[serde(rename = "EXPIRED")]
    Expired,
}

impl CertificateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Revoked => "REVOKED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CertificateStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "VALID" => Ok(Self::Valid),
            "REVOKED" => Ok(Self::Revoked),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(format!("Unknown certificate status: {other}")),
        }
    }
}

/// A program certificates are issued against.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An issued certificate.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Certificate {
    pub id: String,
    pub cert_code: String,
    pub holder_name: String,
    pub holder_email: Option<String>,
    pub program_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: CertificateStatus,
    pub achievements_markdown: String,
    pub signature_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Certificate {
    /// Status as seen by the public verification page: expiry wins over the
    /// stored status when the certificate has lapsed.
    pub fn display_status(&self, now: DateTime<Utc>) -> CertificateStatus {
        match self.expires_at {
            Some(expires_at) if expires_at < now => CertificateStatus::Expired,
            _ => self.status,
        }
    }
}

/// The shape served by the public verification endpoint: certificate fields
/// joined with the program's name and slug, status adjusted for expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicCertificate {
    pub cert_code: String,
    pub holder_name: String,
    pub holder_email: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: CertificateStatus,
    pub achievements_markdown: String,
    pub signature_hash: String,
    pub program_name: String,
    pub program_slug: String,
}

impl PublicCertificate {
    pub(crate) fn from_parts(certificate: Certificate, program: Program) -> Self {
        let status = certificate.display_status(Utc::now());
        Self {
            cert_code: certificate.cert_code,
            holder_name: certificate.holder_name,
            holder_email: certificate.holder_email,
            issued_at: certificate.issued_at,
            expires_at: certificate.expires_at,
            status,
            achievements_markdown: certificate.achievements_markdown,
            signature_hash: certificate.signature_hash,
            program_name: program.name,
            program_slug: program.slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_round_trip() {
        for status in [
            CertificateStatus::Valid,
            CertificateStatus::Revoked,
            CertificateStatus::Expired,
        ] {
            let back = CertificateStatus::try_from(status.as_str().to_string()).unwrap();
            assert_eq!(back, status);
        }
        assert!(CertificateStatus::try_from("BOGUS".to_string()).is_err());
    }

    fn certificate(status: CertificateStatus, expires_at: Option<DateTime<Utc>>) -> Certificate {
        let now = Utc::now();
        Certificate {
            id: "cert-1".to_string(),
            cert_code: "VC-2026-ABC123".to_string(),
            holder_name: "Jane Doe".to_string(),
            holder_email: None,
            program_id: "prog-1".to_string(),
            issued_at: now,
            expires_at,
            status,
            achievements_markdown: "- did things".to_string(),
            signature_hash: "sha256:abc".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_display_status_expiry_wins() {
        let now = Utc::now();

        let lapsed = certificate(
            CertificateStatus::Valid,
            Some(now - Duration::days(1)),
        );
        assert_eq!(lapsed.display_status(now), CertificateStatus::Expired);

        let current = certificate(
            CertificateStatus::Valid,
            Some(now + Duration::days(1)),
        );
        assert_eq!(current.display_status(now), CertificateStatus::Valid);

        let perpetual = certificate(CertificateStatus::Valid, None);
        assert_eq!(perpetual.display_status(now), CertificateStatus::Valid);
    }

    #[test]
    fn test_display_status_revoked_and_expired() {
        let now = Utc::now();

        // A revoked certificate past expiry reports EXPIRED, matching the
        // public endpoint's behavior
        let cert = certificate(
            CertificateStatus::Revoked,
            Some(now - Duration::days(1)),
        );
        assert_eq!(cert.display_status(now), CertificateStatus::Expired);
    }

    #[test]
    fn test_status_serde_rename() {
        let json = serde_json::to_string(&CertificateStatus::Valid).unwrap();
        assert_eq!(json, "\"VALID\"");
    }
}
