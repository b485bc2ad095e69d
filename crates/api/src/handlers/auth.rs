//! Authentication endpoints: Google OAuth login, session refresh, logout.
//!
//! Login exchanges the authorization code for tokens, fetches the Google
//! profile, stores the tokens encrypted on the user record and issues the
//! HMAC-signed session cookie. Everything downstream authenticates with
//! that session, never with the Google tokens directly.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::Json;
use chrono::Utc;
use chronos_common::auth::SessionClaims;
use chronos_core::LinkedAccount;
use chronos_domain::{ChronosError, User};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{clear_session_cookie, session_cookie, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: String,
    #[serde(default)]
    name: String,
    picture: Option<String>,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<SessionResponse>), ApiError> {
    if payload.code.is_empty() {
        return Err(ApiError(ChronosError::InvalidInput("authorization code required".into())));
    }

    let tokens = exchange_code(&state, &payload.code).await?;
    let profile = fetch_profile(&state, &tokens.access_token).await?;

    let encrypt = |plaintext: &str| {
        state
            .crypto
            .encrypt_to_string(plaintext)
            .map_err(|e| ChronosError::Security(format!("token encryption failed: {e}")))
    };

    let account = LinkedAccount {
        google_id: profile.id,
        email: profile.email,
        name: profile.name,
        picture: profile.picture,
        encrypted_access_token: Some(encrypt(&tokens.access_token)?),
        encrypted_refresh_token: tokens
            .refresh_token
            .as_deref()
            .map(encrypt)
            .transpose()?,
    };

    let user = state.users.upsert_account(account).await?;
    let (token, headers) = issue_session(&state, &user)?;

    info!(user_id = %user.id, "login successful");
    Ok((headers, Json(SessionResponse { token, user })))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<(HeaderMap, Json<SessionResponse>), ApiError> {
    let profile = state.users.get_profile(user.user_id).await?;
    let (token, headers) = issue_session(&state, &profile)?;
    Ok((headers, Json(SessionResponse { token, user: profile })))
}

pub async fn logout() -> (HeaderMap, Json<serde_json::Value>) {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&clear_session_cookie()) {
        headers.insert(SET_COOKIE, value);
    }
    (headers, Json(serde_json::json!({ "message": "logout successful" })))
}

fn issue_session(state: &AppState, user: &User) -> Result<(String, HeaderMap), ApiError> {
    let claims = SessionClaims::new(
        user.id.to_string(),
        user.email.clone(),
        Utc::now().timestamp(),
        state.session_ttl_seconds,
    );

    let token = state
        .signer
        .sign(&claims)
        .map_err(|e| ApiError(ChronosError::Security(format!("token signing failed: {e}"))))?;

    let mut headers = HeaderMap::new();
    let cookie = session_cookie(&token, state.session_ttl_seconds);
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError(ChronosError::Internal(format!("invalid cookie value: {e}"))))?;
    headers.insert(SET_COOKIE, value);

    Ok((token, headers))
}

async fn exchange_code(state: &AppState, code: &str) -> Result<GoogleTokenResponse, ApiError> {
    let login = &state.google_login;
    let form = [
        ("code", code),
        ("client_id", login.client_id.as_str()),
        ("client_secret", login.client_secret.as_str()),
        ("redirect_uri", login.redirect_url.as_str()),
        ("grant_type", "authorization_code"),
    ];

    let request = state.http.request(Method::POST, &login.token_endpoint).form(&form);
    let response = state.http.send(request).await.map_err(ApiError)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(%status, "authorization code exchange rejected");
        return Err(ApiError(ChronosError::Auth(format!("code exchange failed: {body}"))));
    }

    response
        .json()
        .await
        .map_err(|e| ApiError(ChronosError::Auth(format!("invalid token response: {e}"))))
}

async fn fetch_profile(state: &AppState, access_token: &str) -> Result<GoogleUserInfo, ApiError> {
    let request = state
        .http
        .request(Method::GET, &state.google_login.userinfo_endpoint)
        .bearer_auth(access_token);
    let response = state.http.send(request).await.map_err(ApiError)?;

    if !response.status().is_success() {
        return Err(ApiError(ChronosError::Auth("failed to fetch user profile".into())));
    }

    response
        .json()
        .await
        .map_err(|e| ApiError(ChronosError::Auth(format!("invalid userinfo response: {e}"))))
}
