use chrono::{Duration, Utc};
use headers::Cookie;
use http::Method;
use http::header::{COOKIE, HeaderMap};
use subtle::ConstantTimeEq;

use crate::session::config::{
    COOKIE_SECURE, CSRF_COOKIE_NAME, CSRF_HEADER_NAME, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME,
};
use crate::session::errors::SessionError;
use crate::session::types::StoredSession;
use crate::utils::{gen_random_string, header_set_cookie};

use crate::storage::GENERIC_CACHE_STORE;

/// Mint a new session and its paired CSRF token.
///
/// Two independent random values are generated; the session record is
/// persisted with an absolute expiry, and both cookies are emitted with the
/// same Max-Age. Only the session cookie is HttpOnly.
pub(crate) async fn create_session() -> Result<HeaderMap, SessionError> {
    let session_id = gen_random_string(32)?;
    let csrf_token = gen_random_string(32)?;

    let now = Utc::now();
    let expires_at = now + Duration::seconds(*SESSION_COOKIE_MAX_AGE as i64);

    let stored_session = StoredSession {
        csrf_token: csrf_token.clone(),
        created_at: now,
        expires_at,
        ttl: *SESSION_COOKIE_MAX_AGE,
    };

    GENERIC_CACHE_STORE
        .lock()
        .await
        .put_with_ttl(
            "session",
            &session_id,
            stored_session.into(),
            *SESSION_COOKIE_MAX_AGE as usize,
        )
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        SESSION_COOKIE_NAME.as_str(),
        &session_id,
        *SESSION_COOKIE_MAX_AGE as i64,
        true,
        *COOKIE_SECURE,
    )?;
    header_set_cookie(
        &mut headers,
        CSRF_COOKIE_NAME.as_str(),
        &csrf_token,
        *SESSION_COOKIE_MAX_AGE as i64,
        false,
        *COOKIE_SECURE,
    )?;

    tracing::debug!("Minted session expiring at {}", expires_at);
    Ok(headers)
}

/// Prepare a logout response: clear both cookies and delete the session
/// record. The store delete is best-effort - clearing the cookies is the
/// operative action for the client.
pub async fn prepare_logout_response(cookies: Cookie) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        SESSION_COOKIE_NAME.as_str(),
        "",
        -86400,
        true,
        *COOKIE_SECURE,
    )?;
    header_set_cookie(
        &mut headers,
        CSRF_COOKIE_NAME.as_str(),
        "",
        -86400,
        false,
        *COOKIE_SECURE,
    )?;

    if let Some(session_id) = cookies.get(SESSION_COOKIE_NAME.as_str()) {
        if let Err(e) = GENERIC_CACHE_STORE
            .lock()
            .await
            .remove("session", session_id)
            .await
        {
            tracing::warn!("Failed to delete session from store during logout: {}", e);
        }
    }

    Ok(headers)
}

/// Check whether a session id maps to a live, unexpired server-side record.
///
/// Re-queries the store on every call: validity is never cached, so expiry
/// takes effect promptly.
pub(crate) async fn validate_session(session_id: &str) -> Result<bool, SessionError> {
    if session_id.is_empty() {
        return Ok(false);
    }

    let Some(cached) = GENERIC_CACHE_STORE
        .lock()
        .await
        .get("session", session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?
    else {
        return Ok(false);
    };

    let stored_session: StoredSession = match cached.try_into() {
        Ok(session) => session,
        Err(_) => return Ok(false),
    };

    // An expired-but-present row must not grant access
    if stored_session.expires_at <= Utc::now() {
        tracing::debug!("Session expired at {}", stored_session.expires_at);
        return Ok(false);
    }

    Ok(true)
}

pub(crate) fn get_cookie_from_headers<'a>(
    headers: &'a HeaderMap,
    cookie_name: &str,
) -> Result<Option<&'a str>, SessionError> {
    let Some(cookie_header) = headers.get(COOKIE) else {
        return Ok(None);
    };

    let cookie_str = cookie_header.to_str().map_err(|e| {
        tracing::error!("Invalid cookie header: {}", e);
        SessionError::HeaderError("Invalid cookie header".to_string())
    })?;

    Ok(cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    }))
}

fn is_unsafe_method(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::DELETE
        || method == Method::PATCH
}

/// The request gate every protected route passes through.
///
/// Steps: session cookie present, session valid and unexpired, and - for
/// state-changing methods only - the CSRF cookie byte-equal to the
/// `x-csrf-token` header. Read-only methods skip the CSRF step; CSRF
/// protects mutations, not reads.
pub async fn authorize(headers: &HeaderMap, method: &Method) -> Result<(), SessionError> {
    let Some(session_id) = get_cookie_from_headers(headers, SESSION_COOKIE_NAME.as_str())? else {
        return Err(SessionError::NoSession);
    };

    if !validate_session(session_id).await? {
        return Err(SessionError::InvalidSession);
    }

    if is_unsafe_method(method) {
        let Some(csrf_cookie) = get_cookie_from_headers(headers, CSRF_COOKIE_NAME.as_str())? else {
            return Err(SessionError::CsrfFailed("No CSRF cookie".to_string()));
        };

        let Some(csrf_header) = headers.get(CSRF_HEADER_NAME).and_then(|h| h.to_str().ok())
        else {
            return Err(SessionError::CsrfFailed("No CSRF header".to_string()));
        };

        // Constant-time comparison; a length mismatch compares unequal
        let matched: bool = csrf_cookie
            .as_bytes()
            .ct_eq(csrf_header.as_bytes())
            .into();
        if !matched {
            tracing::debug!("CSRF token mismatch between cookie and header");
            return Err(SessionError::CsrfFailed("CSRF token mismatch".to_string()));
        }
    }

    Ok(())
}

/// Lightweight "am I logged in" check: session steps only, no CSRF.
pub async fn is_authenticated(headers: &HeaderMap) -> Result<bool, SessionError> {
    let Some(session_id) = get_cookie_from_headers(headers, SESSION_COOKIE_NAME.as_str())? else {
        return Ok(false);
    };

    validate_session(session_id).await
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;
    use chrono::DateTime;
    use http::header::SET_COOKIE;

    /// Extract a cookie value from the Set-Cookie headers of a minted session.
    pub(crate) fn cookie_value_from_response(headers: &HeaderMap, cookie_name: &str) -> String {
        headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .find_map(|cookie| {
                let pair = cookie.split(';').next()?;
                let mut parts = pair.splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(k), Some(v)) if k == cookie_name => Some(v.to_string()),
                    _ => None,
                }
            })
            .expect("cookie not found in response headers")
    }

    /// Build a request HeaderMap presenting the given cookies (and optionally
    /// the CSRF header).
    pub(crate) fn request_headers(
        session_id: &str,
        csrf_cookie: Option<&str>,
        csrf_header: Option<&str>,
    ) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let mut cookie = format!("{}={}", SESSION_COOKIE_NAME.as_str(), session_id);
        if let Some(csrf) = csrf_cookie {
            cookie.push_str(&format!("; {}={}", CSRF_COOKIE_NAME.as_str(), csrf));
        }
        headers.insert(COOKIE, cookie.parse().unwrap());
        if let Some(token) = csrf_header {
            headers.insert(CSRF_HEADER_NAME, token.parse().unwrap());
        }
        headers
    }

    /// Insert a session record with a caller-chosen expiry.
    pub(crate) async fn insert_session_with_expiry(
        session_id: &str,
        csrf_token: &str,
        expires_at: DateTime<Utc>,
    ) {
        let stored = StoredSession {
            csrf_token: csrf_token.to_string(),
            created_at: expires_at - Duration::seconds(60),
            expires_at,
            ttl: 60,
        };
        GENERIC_CACHE_STORE
            .lock()
            .await
            .put_with_ttl("session", session_id, stored.into(), 60)
            .await
            .unwrap();
    }
}
