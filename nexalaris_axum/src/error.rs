use axum::Json;
use http::StatusCode;
use serde_json::{Value, json};

use nexalaris::{CoordinationError, SessionError};

/// Helper trait for converting errors to a standard JSON response error
pub(super) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, Json<Value>)>;
}

/// Maps CoordinationError variants to appropriate status codes. Messages in
/// the variants are already client-safe; infrastructure detail stays in logs.
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, Json<Value>)> {
        self.map_err(|e| {
            let status = match &e {
                CoordinationError::Validation(_) => StatusCode::BAD_REQUEST,
                CoordinationError::WrongCurrentPassword => StatusCode::BAD_REQUEST,
                CoordinationError::InvalidPassword => StatusCode::UNAUTHORIZED,
                CoordinationError::Unauthorized => StatusCode::UNAUTHORIZED,
                CoordinationError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                CoordinationError::NotFound(_) => StatusCode::NOT_FOUND,
                CoordinationError::Conflict(_) => StatusCode::CONFLICT,
                CoordinationError::SessionError(
                    SessionError::NoSession
                    | SessionError::InvalidSession
                    | SessionError::CsrfFailed(_),
                ) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                "Internal server error".to_string()
            } else {
                e.to_string()
            };
            (status, Json(json!({ "error": message })))
        })
    }
}
