use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::TypedHeader;
use headers::Cookie;
use serde::Deserialize;
use serde_json::{Value, json};

use nexalaris::{
    Certificate, IssueCertificateRequest, LoginRateLimiter, Program, ProgramUpsertRequest,
    handle_change_password_core, handle_login_core, handle_logout_core, is_authenticated,
    issue_certificate_core, list_certificates_core, revoke_certificate_core,
};

use super::config::TRUST_FORWARDED_FOR;
use super::error::IntoResponseError;
use super::middleware::require_admin;

/// Shared state for the admin routes. The rate limiter is an owned instance
/// rather than a process global so tests and embedders can supply their own.
pub struct AppState {
    pub rate_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn from_env() -> Self {
        Self {
            rate_limiter: LoginRateLimiter::from_env(),
        }
    }
}

pub(super) fn router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/logout", post(logout))
        .route("/change-password", post(change_password))
        .route("/certificates", get(list_certificates))
        .route("/certificates/issue", post(issue_certificate))
        .route("/certificates/{cert_code}/revoke", post(revoke_certificate))
        .route("/programs", post(create_program))
        .route("/programs/{id}", put(update_program).delete(delete_program))
        .layer(from_fn(require_admin));

    Router::new()
        .route("/login", post(login))
        .route("/verify", get(verify))
        .merge(gated)
        .with_state(state)
}

/// Derive the rate-limit client id: the socket peer address, or the first
/// `x-forwarded-for` entry when the deployment has opted into trusting it.
fn client_id(addr: &SocketAddr, headers: &HeaderMap) -> String {
    if *TRUST_FORWARDED_FOR {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }
    }
    addr.ip().to_string()
}

#[derive(Deserialize)]
struct LoginRequest {
    password: Option<String>,
}

async fn login(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let client = client_id(&addr, &headers);
    let response_headers = handle_login_core(&state.rate_limiter, &client, body.password.as_deref())
        .await
        .into_response_error()?;

    Ok((response_headers, Json(json!({ "ok": true }))))
}

async fn logout(
    TypedHeader(cookies): TypedHeader<Cookie>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let response_headers = handle_logout_core(cookies).await.into_response_error()?;
    Ok((response_headers, Json(json!({ "ok": true }))))
}

/// Session probe for the admin UI. Not gated: the 401 body is its answer.
async fn verify(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match is_authenticated(&headers).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Ok(false) => (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false }))),
        Err(err) => {
            tracing::error!("Session probe failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false })),
            )
        }
    }
}

#[derive(Deserialize)]
struct ChangePasswordRequest {
    current_password: Option<String>,
    new_password: Option<String>,
    confirm_new_password: Option<String>,
}

async fn change_password(
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    handle_change_password_core(
        body.current_password.as_deref(),
        body.new_password.as_deref(),
        body.confirm_new_password.as_deref(),
    )
    .await
    .into_response_error()?;

    Ok(Json(json!({ "ok": true })))
}

async fn list_certificates() -> Result<Json<Vec<Certificate>>, (StatusCode, Json<Value>)> {
    let certificates = list_certificates_core().await.into_response_error()?;
    Ok(Json(certificates))
}

async fn issue_certificate(
    Json(body): Json<IssueCertificateRequest>,
) -> Result<Json<Certificate>, (StatusCode, Json<Value>)> {
    let certificate = issue_certificate_core(&body).await.into_response_error()?;
    Ok(Json(certificate))
}

async fn revoke_certificate(
    Path(cert_code): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    revoke_certificate_core(&cert_code)
        .await
        .into_response_error()?;
    Ok(Json(json!({ "ok": true })))
}

async fn create_program(
    Json(mut body): Json<ProgramUpsertRequest>,
) -> Result<Json<Program>, (StatusCode, Json<Value>)> {
    // POST always creates; an id in the body is ignored.
    body.id = None;
    let program = nexalaris::upsert_program_core(&body)
        .await
        .into_response_error()?;
    Ok(Json(program))
}

async fn update_program(
    Path(id): Path<String>,
    Json(mut body): Json<ProgramUpsertRequest>,
) -> Result<Json<Program>, (StatusCode, Json<Value>)> {
    body.id = Some(id);
    let program = nexalaris::upsert_program_core(&body)
        .await
        .into_response_error()?;
    Ok(Json(program))
}

async fn delete_program(
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    nexalaris::delete_program_core(&id)
        .await
        .into_response_error()?;
    Ok(Json(json!({ "ok": true })))
}
