//! services/api/src/web/middleware.rs
//!
//! Session middleware for protecting routes. Per request the flow is a small
//! state machine: no token ends in 401; a present token is verified, then
//! the user it names is loaded; invalid tokens end in 401 with the cookie
//! cleared; a missing user ends in 404. On success the user record is
//! attached to the request, and a token near expiry is reissued on the way
//! out.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use doclens_core::ports::PortError;
use doclens_core::token::Refresh;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::web::auth::session_cookie;
use crate::web::state::AppState;

/// Pulls the session token out of the request: the `token` cookie first,
/// then an `Authorization: Bearer` header.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .find_map(|c| c.trim().strip_prefix("token="))
                .map(str::to_string)
        });
    if from_cookie.is_some() {
        return from_cookie;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Middleware that validates the session token and loads the user.
///
/// If valid, inserts the `User` into request extensions for handlers to use.
/// If invalid or missing, short-circuits with 401 (clearing the cookie when
/// a bad token was presented) or 404 when the user no longer exists.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. NoToken -> Unauthenticated
    let token = extract_token(req.headers()).ok_or(ApiError::Unauthenticated)?;

    // 2. TokenPresent -> Verifying -> {Valid, Invalid}
    //    TokenError converts to ApiError::InvalidToken, which clears the cookie.
    let claims = state.tokens.verify(&token)?;

    // 3. Valid -> {UserFound, UserMissing}
    let user = state.users.get_user_by_id(claims.sub).await.map_err(|e| {
        if !matches!(&e, PortError::NotFound(_)) {
            error!("Failed to load user for a valid token: {e}");
        }
        ApiError::from(e)
    })?;

    // Sliding renewal is decided before the handler runs so the decision is
    // based on the token as presented.
    let refresh = state
        .tokens
        .refresh_if_near_expiry(&token, state.renewal_threshold())?;

    req.extensions_mut().insert(user);
    let mut response = next.run(req).await;

    // A handler that already set the session cookie (logout clearing it,
    // most importantly) must not be overridden by a renewal.
    let handler_set_session_cookie = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|v| {
            v.to_str()
                .map(|c| c.trim_start().starts_with("token="))
                .unwrap_or(false)
        });

    if handler_set_session_cookie {
        return Ok(response);
    }

    if let Refresh::Renewed(renewed) = refresh {
        debug!("session token renewed via sliding window");
        let cookie = session_cookie(
            &renewed,
            state.token_ttl().num_seconds(),
            state.config.cookie_secure,
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    Ok(response)
}
