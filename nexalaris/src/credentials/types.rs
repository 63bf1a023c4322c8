use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single admin credential row.
///
/// Exactly one logical record exists; it is addressed by the fixed
/// [`SINGLETON_ID`] rather than "first match" so an update can never target
/// an ambiguous row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub(crate) struct AdminCredential {
    pub(crate) id: i64,
    pub(crate) password_hash: String,
    pub(crate) updated_at: DateTime<Utc>,
}

pub(crate) const SINGLETON_ID: i64 = 1;
