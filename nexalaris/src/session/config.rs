use std::sync::LazyLock;

/// Cookie carrying the server-side session id. HttpOnly.
pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("nexalaris_admin_session".to_string())
});

/// Cookie carrying the CSRF token. Deliberately readable by the client so it
/// can be mirrored into the request header (double-submit defense).
pub static CSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CSRF_COOKIE_NAME")
        .ok()
        .unwrap_or("nexalaris_admin_csrf".to_string())
});

/// Header a mutating request must echo the CSRF cookie value in.
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

/// Session lifetime in seconds. The source history disagreed between 1 hour
/// and 30 days; the short value is the shipped policy.
pub(crate) static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3600) // 1 hour
});

/// Whether cookies carry the Secure attribute. Enable in production.
pub(crate) static COOKIE_SECURE: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(false)
});
