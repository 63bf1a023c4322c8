//! Combined router for the admin and public API endpoints

use std::sync::Arc;

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::admin::AppState;

/// Create the API router, meant to be nested at [`crate::NX_ROUTE_PREFIX`].
///
/// The endpoints will be available at:
/// - {NX_ROUTE_PREFIX}/admin/...
/// - {NX_ROUTE_PREFIX}/programs
/// - {NX_ROUTE_PREFIX}/certificates/public/{cert_code}
pub fn nexalaris_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/admin", super::admin::router(state))
        .merge(super::public::router())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}

/// Same as [`nexalaris_router`] but without the HTTP tracing middleware, for
/// embedders that bring their own.
pub fn nexalaris_router_no_trace(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/admin", super::admin::router(state))
        .merge(super::public::router())
}
