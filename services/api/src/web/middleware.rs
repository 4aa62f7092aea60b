//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use care_booking_core::ports::PortError;
use care_booking_core::session::Session;
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Reads the auth session id from the `Cookie` header, if present.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

/// A session whose profile is gone is unauthorized; a failing backend is not.
fn profile_lookup_status(user_id: Uuid, err: PortError) -> StatusCode {
    match err {
        PortError::NotFound(_) | PortError::Unauthorized => {
            warn!("Session user {} has no profile", user_id);
            StatusCode::UNAUTHORIZED
        }
        other => {
            error!("Failed to load profile for {}: {:?}", user_id, other);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Middleware that validates the auth session cookie and resolves the caller's profile.
///
/// If valid, inserts a `Session` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Parse session ID from cookie
    let auth_session_id = session_id_from_headers(req.headers())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    // 2. Validate auth session in database, get user_id
    let user_id = state
        .db
        .validate_auth_session(&auth_session_id)
        .await
        .map_err(|e| {
            warn!("Rejected auth session: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?;

    // 3. Load the profile that carries the role
    let profile = state
        .db
        .get_profile(user_id)
        .await
        .map_err(|e| profile_lookup_status(user_id, e))?;

    // 4. Insert the session context into request extensions
    req.extensions_mut().insert(Session::from_profile(&profile));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let h = headers("theme=dark; session=abc-123; lang=en");
        assert_eq!(session_id_from_headers(&h), Some("abc-123"));
    }

    #[test]
    fn ignores_cookies_that_merely_start_with_session() {
        let h = headers("session_hint=1");
        assert_eq!(session_id_from_headers(&h), None);
    }

    #[test]
    fn missing_profile_is_unauthorized_but_outage_is_a_server_error() {
        let user_id = Uuid::new_v4();
        assert_eq!(
            profile_lookup_status(user_id, PortError::NotFound("Profile".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            profile_lookup_status(user_id, PortError::Unexpected("pool timed out".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn empty_or_missing_cookie_yields_none() {
        assert_eq!(session_id_from_headers(&headers("session=")), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }
}
