//! Session guard for signed-in pages.
//!
//! `CurrentUser` asks the auth provider who owns the session cookie. A
//! missing cookie and any provider failure are treated the same way:
//! `AppError::Unauthorized`, which responds with a redirect to `/login`. There is no retry; the next guarded request asks
//! again.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::errors::AppError;
use crate::models::user::Session;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_PATH: &str = "/login";

/// Reads the session token from the `Cookie` header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value storing the access token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn cleared_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extractor exposing the authenticated user to a handler.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            debug!("No session cookie on {}, redirecting to login", parts.uri.path());
            return Err(AppError::Unauthorized);
        };

        match state.auth.get_current_user(&token).await {
            Ok(user) => Ok(CurrentUser(Session::from_user(user, token))),
            Err(e) => {
                debug!("Session lookup failed on {}: {e}", parts.uri.path());
                Err(AppError::Unauthorized)
            }
        }
    }
}
