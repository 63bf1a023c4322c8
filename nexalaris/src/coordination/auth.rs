use headers::Cookie;
use http::HeaderMap;

use crate::credentials::{change_admin_password, verify_admin_password};
use crate::ratelimit::LoginRateLimiter;
use crate::session::{create_session, prepare_logout_response};

use super::errors::CoordinationError;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Handle an admin login attempt.
///
/// Order matters: the rate limiter is consulted (and records the attempt)
/// before anything else, so brute-force traffic is throttled even when it
/// would fail for other reasons. Returns the `Set-Cookie` headers for the
/// freshly minted session and CSRF cookies.
pub async fn handle_login_core(
    limiter: &LoginRateLimiter,
    client_id: &str,
    password: Option<&str>,
) -> Result<HeaderMap, CoordinationError> {
    if limiter.is_rate_limited(client_id).await {
        tracing::warn!("Login rate limit exceeded for client {client_id}");
        return Err(CoordinationError::RateLimited);
    }

    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => {
            return Err(CoordinationError::Validation(
                "Password is required".to_string(),
            ));
        }
    };

    if !verify_admin_password(password).await? {
        tracing::info!("Failed admin login attempt from client {client_id}");
        return Err(CoordinationError::InvalidPassword);
    }

    let headers = create_session().await?;
    tracing::info!("Admin login succeeded");
    Ok(headers)
}

/// Destroy the presented session and emit expired cookies. The route gate
/// has already authorized the request; this only tears state down.
pub async fn handle_logout_core(cookies: Cookie) -> Result<HeaderMap, CoordinationError> {
    let headers = prepare_logout_response(cookies).await?;
    Ok(headers)
}

/// Change the admin password after re-verifying the current one.
///
/// Field validation happens here so the route handler stays a passthrough:
/// presence, confirmation match, then the minimum length policy.
pub async fn handle_change_password_core(
    current_password: Option<&str>,
    new_password: Option<&str>,
    confirm_new_password: Option<&str>,
) -> Result<(), CoordinationError> {
    let (current, new, confirm) = match (current_password, new_password, confirm_new_password) {
        (Some(c), Some(n), Some(r)) if !c.is_empty() && !n.is_empty() && !r.is_empty() => (c, n, r),
        _ => {
            return Err(CoordinationError::Validation(
                "All fields are required".to_string(),
            ));
        }
    };

    if new != confirm {
        return Err(CoordinationError::Validation(
            "New passwords do not match".to_string(),
        ));
    }

    if new.len() < MIN_PASSWORD_LENGTH {
        return Err(CoordinationError::Validation(format!(
            "New password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    change_admin_password(current, new).await?;
    tracing::info!("Admin password changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use http::Method;
    use serial_test::serial;

    use crate::session::test_helpers::{cookie_value_from_response, request_headers};
    use crate::session::{CSRF_COOKIE_NAME, SESSION_COOKIE_NAME, SessionError, authorize};
    use crate::test_utils::init_test_environment;

    fn test_limiter(max_attempts: u64) -> LoginRateLimiter {
        LoginRateLimiter::new(Duration::minutes(15), max_attempts, None)
    }

    async fn set_password(password: &str) {
        use crate::credentials::CredentialStore;
        let hash = bcrypt::hash(password, 4).unwrap();
        let _ = CredentialStore::delete_credential().await;
        CredentialStore::insert_credential(&hash).await.unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn test_login_missing_password_is_validation_error() {
        init_test_environment().await;
        let limiter = test_limiter(5);

        for password in [None, Some("")] {
            let err = handle_login_core(&limiter, "10.0.0.1", password)
                .await
                .unwrap_err();
            assert!(matches!(err, CoordinationError::Validation(_)));
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_login_wrong_password_is_rejected() {
        init_test_environment().await;
        set_password("correct horse").await;
        let limiter = test_limiter(5);

        let err = handle_login_core(&limiter, "10.0.0.2", Some("battery staple"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinationError::InvalidPassword));
    }

    #[tokio::test]
    #[serial]
    async fn test_login_success_sets_cookies() {
        init_test_environment().await;
        set_password("correct horse").await;
        let limiter = test_limiter(5);

        let headers = handle_login_core(&limiter, "10.0.0.3", Some("correct horse"))
            .await
            .unwrap();
        let session = cookie_value_from_response(&headers, SESSION_COOKIE_NAME.as_str());
        let csrf = cookie_value_from_response(&headers, CSRF_COOKIE_NAME.as_str());
        assert!(!session.is_empty());
        assert!(!csrf.is_empty());
        assert_ne!(session, csrf);
    }

    #[tokio::test]
    #[serial]
    async fn test_rate_limit_checked_before_password() {
        init_test_environment().await;
        set_password("correct horse").await;
        let limiter = test_limiter(5);

        for _ in 0..5 {
            let err = handle_login_core(&limiter, "10.0.0.4", Some("wrong"))
                .await
                .unwrap_err();
            assert!(matches!(err, CoordinationError::InvalidPassword));
        }

        // 6th attempt is throttled even though the password is now correct.
        let err = handle_login_core(&limiter, "10.0.0.4", Some("correct horse"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinationError::RateLimited));
    }

    #[tokio::test]
    #[serial]
    async fn test_change_password_validation() {
        init_test_environment().await;
        set_password("original pass").await;

        let cases = [
            (None, Some("new password"), Some("new password")),
            (Some("original pass"), Some("new password"), Some("other")),
            (Some("original pass"), Some("short"), Some("short")),
        ];
        for (current, new, confirm) in cases {
            let err = handle_change_password_core(current, new, confirm)
                .await
                .unwrap_err();
            assert!(matches!(err, CoordinationError::Validation(_)));
        }

        let err = handle_change_password_core(
            Some("not the original"),
            Some("new password"),
            Some("new password"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoordinationError::WrongCurrentPassword));

        handle_change_password_core(
            Some("original pass"),
            Some("new password"),
            Some("new password"),
        )
        .await
        .unwrap();
        assert!(verify_admin_password("new password").await.unwrap());
    }

    /// Full lifecycle: throttled brute force, successful login, CSRF gate,
    /// logout, stale-session denial.
    #[tokio::test]
    #[serial]
    async fn test_login_session_csrf_logout_lifecycle() {
        init_test_environment().await;
        set_password("correct horse").await;
        let limiter = test_limiter(5);
        let client = "203.0.113.9";

        for _ in 0..5 {
            let err = handle_login_core(&limiter, client, Some("wrong"))
                .await
                .unwrap_err();
            assert!(matches!(err, CoordinationError::InvalidPassword));
        }
        let err = handle_login_core(&limiter, client, Some("correct horse"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinationError::RateLimited));

        // A different client is unaffected and logs in.
        let login_headers = handle_login_core(&limiter, "203.0.113.10", Some("correct horse"))
            .await
            .unwrap();
        let session = cookie_value_from_response(&login_headers, SESSION_COOKIE_NAME.as_str());
        let csrf = cookie_value_from_response(&login_headers, CSRF_COOKIE_NAME.as_str());

        // Mutation without the CSRF header is denied.
        let headers = request_headers(&session, Some(&csrf), None);
        let err = authorize(&headers, &Method::POST).await.unwrap_err();
        assert!(matches!(err, SessionError::CsrfFailed(_)));

        // Mirroring the cookie into the header passes the gate.
        let headers = request_headers(&session, Some(&csrf), Some(&csrf));
        authorize(&headers, &Method::POST).await.unwrap();

        // Logout, then the old session cookie no longer authorizes.
        let mut cookie_headers = HeaderMap::new();
        cookie_headers.insert(
            http::header::COOKIE,
            format!(
                "{}={session}; {}={csrf}",
                SESSION_COOKIE_NAME.as_str(),
                CSRF_COOKIE_NAME.as_str()
            )
            .parse()
            .unwrap(),
        );
        let cookies: Cookie = headers::HeaderMapExt::typed_get(&cookie_headers).unwrap();
        handle_logout_core(cookies).await.unwrap();

        let headers = request_headers(&session, Some(&csrf), Some(&csrf));
        let err = authorize(&headers, &Method::POST).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidSession));
    }
}
