use std::{env, sync::LazyLock};

/// Sliding window length in seconds
pub(super) static LOGIN_RATE_LIMIT_WINDOW_SECONDS: LazyLock<i64> = LazyLock::new(|| {
    env::var("LOGIN_RATE_LIMIT_WINDOW_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(900) // 15 minutes
});

/// Attempts admitted per window before blocking
pub(super) static LOGIN_RATE_LIMIT_MAX_ATTEMPTS: LazyLock<u64> = LazyLock::new(|| {
    env::var("LOGIN_RATE_LIMIT_MAX_ATTEMPTS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5)
});

/// Optional connection string for the external counter backend. Absent means
/// in-process only.
pub(super) static LOGIN_RATE_LIMIT_STORE_URL: LazyLock<Option<String>> =
    LazyLock::new(|| env::var("LOGIN_RATE_LIMIT_STORE_URL").ok());
