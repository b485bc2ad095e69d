//! Caller identity extraction.
//!
//! Requests authenticate with the signed session token, either as a bearer
//! header or as the `chronos_session` cookie set at login. The extractor
//! resolves the token into an [`AuthUser`] before any service runs; handlers
//! only ever see an already-verified identity.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use chrono::Utc;
use chronos_domain::ChronosError;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "chronos_session";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or(ApiError(ChronosError::Unauthorized))?;

        let claims = state
            .signer
            .verify(&token, Utc::now().timestamp())
            .map_err(|_| ApiError(ChronosError::Unauthorized))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| ApiError(ChronosError::Unauthorized))?;

        Ok(AuthUser { user_id, email: claims.email })
    }
}

fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let cookies = parts.headers.get(COOKIE).and_then(|v| v.to_str().ok())?;
    cookies.split(';').map(str::trim).find_map(|cookie| {
        cookie.strip_prefix(SESSION_COOKIE).and_then(|rest| rest.strip_prefix('=')).map(String::from)
    })
}

/// Build the session cookie value for a freshly signed token.
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; Secure; SameSite=None; Max-Age={max_age_seconds}"
    )
}

/// Build the cookie value that clears the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Secure; SameSite=None; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn extracts_bearer_token() {
        let parts = parts_with_headers(&[("authorization", "Bearer abc.def")]);
        assert_eq!(extract_token(&parts).as_deref(), Some("abc.def"));
    }

    #[test]
    fn extracts_session_cookie() {
        let parts =
            parts_with_headers(&[("cookie", "other=1; chronos_session=tok.sig; theme=dark")]);
        assert_eq!(extract_token(&parts).as_deref(), Some("tok.sig"));
    }

    #[test]
    fn missing_credentials_yield_none() {
        let parts = parts_with_headers(&[]);
        assert!(extract_token(&parts).is_none());
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
