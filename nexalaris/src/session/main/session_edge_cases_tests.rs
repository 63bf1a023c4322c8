//! Edge-case tests for the session lifecycle and the authorization gate.

use chrono::{Duration, Utc};
use headers::HeaderMapExt;
use http::Method;
use http::header::{COOKIE, HeaderMap};
use serial_test::serial;

use super::session::test_helpers::*;
use super::session::{authorize, create_session, prepare_logout_response, validate_session};
use crate::session::config::{CSRF_COOKIE_NAME, SESSION_COOKIE_NAME};
use crate::session::errors::SessionError;
use crate::test_utils::init_test_environment;

#[tokio::test]
#[serial]
async fn test_session_tokens_are_unique_across_mints() {
    init_test_environment().await;

    let first = create_session().await.unwrap();
    let second = create_session().await.unwrap();

    let id1 = cookie_value_from_response(&first, SESSION_COOKIE_NAME.as_str());
    let id2 = cookie_value_from_response(&second, SESSION_COOKIE_NAME.as_str());
    let csrf1 = cookie_value_from_response(&first, CSRF_COOKIE_NAME.as_str());
    let csrf2 = cookie_value_from_response(&second, CSRF_COOKIE_NAME.as_str());

    assert_ne!(id1, id2);
    assert_ne!(csrf1, csrf2);
}

#[tokio::test]
#[serial]
async fn test_session_invalid_exactly_at_expiry() {
    init_test_environment().await;

    // expires_at == now must already fail the strict comparison
    insert_session_with_expiry("boundary-session", "csrf", Utc::now()).await;
    assert!(!validate_session("boundary-session").await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_expired_session_denied_by_authorizer() {
    init_test_environment().await;

    insert_session_with_expiry(
        "stale-session",
        "csrf",
        Utc::now() - Duration::seconds(3600),
    )
    .await;

    let request = request_headers("stale-session", None, None);
    assert!(matches!(
        authorize(&request, &Method::GET).await,
        Err(SessionError::InvalidSession)
    ));
}

#[tokio::test]
#[serial]
async fn test_csrf_header_checked_for_all_unsafe_methods() {
    init_test_environment().await;

    let minted = create_session().await.unwrap();
    let session_id = cookie_value_from_response(&minted, SESSION_COOKIE_NAME.as_str());
    let csrf = cookie_value_from_response(&minted, CSRF_COOKIE_NAME.as_str());

    let without_header = request_headers(&session_id, Some(&csrf), None);
    for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        assert!(
            matches!(
                authorize(&without_header, &method).await,
                Err(SessionError::CsrfFailed(_))
            ),
            "{method} must require the CSRF header"
        );
    }

    for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
        assert!(
            authorize(&without_header, &method).await.is_ok(),
            "{method} must not require the CSRF header"
        );
    }
}

#[tokio::test]
#[serial]
async fn test_csrf_cookie_missing_denied_even_with_header() {
    init_test_environment().await;

    let minted = create_session().await.unwrap();
    let session_id = cookie_value_from_response(&minted, SESSION_COOKIE_NAME.as_str());
    let csrf = cookie_value_from_response(&minted, CSRF_COOKIE_NAME.as_str());

    // Header present but no readable cookie to pair it with
    let request = request_headers(&session_id, None, Some(&csrf));
    assert!(matches!(
        authorize(&request, &Method::POST).await,
        Err(SessionError::CsrfFailed(_))
    ));
}

#[tokio::test]
#[serial]
async fn test_logout_without_session_cookie_still_clears() {
    init_test_environment().await;

    let mut request = HeaderMap::new();
    request.insert(COOKIE, "unrelated=1".parse().unwrap());
    let cookies = request.typed_get().unwrap();

    let headers = prepare_logout_response(cookies).await.unwrap();
    assert_eq!(headers.get_all(http::header::SET_COOKIE).iter().count(), 2);
}

#[tokio::test]
#[serial]
async fn test_authorizer_never_repairs_a_destroyed_session() {
    init_test_environment().await;

    let minted = create_session().await.unwrap();
    let session_id = cookie_value_from_response(&minted, SESSION_COOKIE_NAME.as_str());
    let csrf = cookie_value_from_response(&minted, CSRF_COOKIE_NAME.as_str());

    let mut with_cookie = HeaderMap::new();
    with_cookie.insert(
        COOKIE,
        format!("{}={}", SESSION_COOKIE_NAME.as_str(), session_id)
            .parse()
            .unwrap(),
    );
    let cookies = with_cookie.typed_get().unwrap();
    prepare_logout_response(cookies).await.unwrap();

    // Even a fully formed request is denied once the record is gone
    let request = request_headers(&session_id, Some(&csrf), Some(&csrf));
    assert!(matches!(
        authorize(&request, &Method::POST).await,
        Err(SessionError::InvalidSession)
    ));
}
