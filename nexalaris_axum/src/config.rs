//! Central configuration for the nexalaris_axum crate

use std::sync::LazyLock;

/// Mount point for the API router.
/// Default: "/api"
pub static NX_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("NX_ROUTE_PREFIX").unwrap_or_else(|_| "/api".to_string()));

/// Whether the first `x-forwarded-for` entry is trusted for rate-limit
/// client identification. Only enable behind a proxy that overwrites the
/// header; the value is client-supplied otherwise and trivially rotated.
pub static TRUST_FORWARDED_FOR: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("TRUST_FORWARDED_FOR")
        .map(|val| val.to_lowercase() == "true")
        .unwrap_or(false)
});
