//! Credential resolution for calendar calls.
//!
//! Loads the user's encrypted OAuth tokens, decrypts them and exchanges the
//! refresh token for a fresh access token. The stored access token is
//! treated as always stale, so every calendar call performs one refresh
//! grant; the refreshed token is deliberately not written back.

use std::sync::Arc;

use chronos_common::crypto::EncryptionService;
use chronos_core::{CalendarError, UserRepository};
use reqwest::Method;
use tracing::{debug, error};
use uuid::Uuid;

use super::types::TokenResponse;
use crate::http::HttpClient;

const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// OAuth client settings for the Google token endpoint.
#[derive(Debug, Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub token_endpoint: String,
}

impl GoogleOAuthSettings {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
        }
    }
}

/// A transient authorization for one calendar call.
#[derive(Clone)]
pub struct AuthorizedCalendar {
    pub access_token: String,
}

impl std::fmt::Debug for AuthorizedCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedCalendar").field("access_token", &"[REDACTED]").finish()
    }
}

/// Resolves a user's stored credentials into a usable access token.
pub struct CredentialResolver {
    user_repo: Arc<dyn UserRepository>,
    crypto: Arc<EncryptionService>,
    http: HttpClient,
    oauth: GoogleOAuthSettings,
}

impl CredentialResolver {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        crypto: Arc<EncryptionService>,
        http: HttpClient,
        oauth: GoogleOAuthSettings,
    ) -> Self {
        Self { user_repo, crypto, http, oauth }
    }

    /// Resolve credentials for the user, refreshing the access token.
    pub async fn resolve(&self, user_id: Uuid) -> Result<AuthorizedCalendar, CalendarError> {
        let user = self
            .user_repo
            .get_by_id(user_id)
            .await
            .map_err(|err| {
                error!(user_id = %user_id, error = %err, "failed to load user for calendar call");
                CalendarError::Internal(format!("user lookup failed: {err}"))
            })?
            .ok_or(CalendarError::UserNotFound)?;

        let access_ciphertext = user
            .encrypted_access_token
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(CalendarError::MissingCredentials)?;

        // Decrypted only transiently; the plaintext never outlives this call.
        let _access_token = self.crypto.decrypt_from_string(access_ciphertext).map_err(|err| {
            error!(user_id = %user_id, error = %err, "failed to decrypt access token");
            CalendarError::DecryptionFailed
        })?;

        let refresh_token = match user.encrypted_refresh_token.as_deref().filter(|c| !c.is_empty())
        {
            Some(ciphertext) => self.crypto.decrypt_from_string(ciphertext).map_err(|err| {
                error!(user_id = %user_id, error = %err, "failed to decrypt refresh token");
                CalendarError::DecryptionFailed
            })?,
            None => {
                return Err(CalendarError::RefreshFailed("no refresh token stored".into()));
            }
        };

        let access_token = self.refresh_access_token(&refresh_token).await?;
        debug!(user_id = %user_id, "calendar access token refreshed");

        Ok(AuthorizedCalendar { access_token })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, CalendarError> {
        let form = [
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let request =
            self.http.request(Method::POST, &self.oauth.token_endpoint).form(&form);

        let response = self
            .http
            .send(request)
            .await
            .map_err(|err| CalendarError::RefreshFailed(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::RefreshFailed(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|err| CalendarError::RefreshFailed(format!("invalid token response: {err}")))?;

        Ok(tokens.access_token)
    }
}
