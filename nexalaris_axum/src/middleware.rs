use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Gate for admin routes: session validation plus the CSRF double-submit
/// check on unsafe methods. Denials get a uniform body; the concrete reason
/// is logged, never sent to the client.
pub async fn require_admin(req: Request, next: Next) -> Response {
    match nexalaris::authorize(req.headers(), req.method()).await {
        Ok(()) => next.run(req).await,
        Err(err) => {
            tracing::warn!("Admin request denied: {}", err);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response()
        }
    }
}
