use std::sync::LazyLock;

use crate::storage::DB_TABLE_PREFIX;

/// Table name for the admin credential singleton
pub(super) static DB_TABLE_ADMIN_AUTH: LazyLock<String> =
    LazyLock::new(|| format!("{}admin_auth", DB_TABLE_PREFIX.as_str()));
