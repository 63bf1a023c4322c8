use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::errors::SessionError;
use crate::storage::CacheData;

/// Server-side session record, serialized into the cache store.
///
/// The CSRF token minted with the session is kept here so a verify call can
/// echo it; the authorizer's deciding check remains the cookie/header pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StoredSession {
    pub(super) csrf_token: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) expires_at: DateTime<Utc>,
    pub(super) ttl: u64,
}

impl From<StoredSession> for CacheData {
    fn from(data: StoredSession) -> Self {
        Self {
            value: serde_json::to_string(&data).expect("Failed to serialize StoredSession"),
        }
    }
}

impl TryFrom<CacheData> for StoredSession {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_stored_session_round_trip() {
        let now = Utc::now();
        let session = StoredSession {
            csrf_token: "token123".to_string(),
            created_at: now,
            expires_at: now + Duration::seconds(3600),
            ttl: 3600,
        };

        let cache_data: CacheData = session.clone().into();
        let back: StoredSession = cache_data.try_into().unwrap();

        assert_eq!(back.csrf_token, session.csrf_token);
        assert_eq!(back.expires_at, session.expires_at);
        assert!(back.expires_at > back.created_at);
    }

    #[test]
    fn test_corrupt_cache_data_rejected() {
        let cache_data = CacheData {
            value: "not a session".to_string(),
        };
        let result: Result<StoredSession, _> = cache_data.try_into();
        assert!(result.is_err());
    }
}
