use std::sync::LazyLock;

use crate::storage::DB_TABLE_PREFIX;

/// Table name for programs
pub(super) static DB_TABLE_PROGRAMS: LazyLock<String> =
    LazyLock::new(|| format!("{}programs", DB_TABLE_PREFIX.as_str()));

/// Table name for issued certificates
pub(super) static DB_TABLE_CERTIFICATES: LazyLock<String> =
    LazyLock::new(|| format!("{}certificates", DB_TABLE_PREFIX.as_str()));
