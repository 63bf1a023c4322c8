use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::get,
};
use serde_json::Value;

use nexalaris::{Program, PublicCertificate, get_public_certificate_core, list_programs_core};

use super::error::IntoResponseError;

pub(super) fn router() -> Router {
    Router::new()
        .route("/programs", get(list_programs))
        .route("/certificates/public/{cert_code}", get(get_certificate))
}

async fn list_programs() -> Result<Json<Vec<Program>>, (StatusCode, Json<Value>)> {
    let programs = list_programs_core().await.into_response_error()?;
    Ok(Json(programs))
}

/// Public verification endpoint: anyone holding a certificate code can look
/// it up. Reports EXPIRED dynamically once `expires_at` has passed.
async fn get_certificate(
    Path(cert_code): Path<String>,
) -> Result<Json<PublicCertificate>, (StatusCode, Json<Value>)> {
    let certificate = get_public_certificate_core(&cert_code)
        .await
        .into_response_error()?;
    Ok(Json(certificate))
}
