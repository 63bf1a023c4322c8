//! Axum integration for the Nexalaris certificate platform.
//!
//! Exposes the admin authentication endpoints (login, logout, verify,
//! change-password), the gated certificate/program administration routes,
//! and the public verification endpoints as a single mountable [`Router`].
//!
//! [`Router`]: axum::Router

mod admin;
mod config;
mod error;
mod middleware;
mod public;
mod router;

pub use admin::AppState;
pub use config::{NX_ROUTE_PREFIX, TRUST_FORWARDED_FOR};
pub use middleware::require_admin;
pub use router::{nexalaris_router, nexalaris_router_no_trace};

// Re-export the initialization function so embedders depend on one crate.
pub use nexalaris::init;
