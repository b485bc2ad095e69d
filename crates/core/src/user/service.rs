//! User profile service.

use std::sync::Arc;

use chrono::Utc;
use chronos_domain::{ChronosError, Result, User};
use tracing::info;
use uuid::Uuid;

use super::ports::UserRepository;

/// Profile fields returned by the identity provider at login time.
#[derive(Debug, Clone)]
pub struct LinkedAccount {
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub encrypted_access_token: Option<String>,
    pub encrypted_refresh_token: Option<String>,
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<User> {
        self.repo
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ChronosError::NotFound(format!("user {user_id}")))
    }

    /// Create or refresh the user record after a successful provider login.
    ///
    /// A returning user keeps their id; profile fields and token ciphertexts
    /// are overwritten with the freshly issued values. A missing refresh
    /// token ciphertext keeps the previously stored one, since the provider
    /// only issues refresh tokens on first consent.
    pub async fn upsert_account(&self, account: LinkedAccount) -> Result<User> {
        let now = Utc::now();

        if let Some(mut existing) = self.repo.get_by_google_id(&account.google_id).await? {
            existing.email = account.email;
            existing.name = account.name;
            existing.picture = account.picture;
            existing.encrypted_access_token = account.encrypted_access_token;
            if account.encrypted_refresh_token.is_some() {
                existing.encrypted_refresh_token = account.encrypted_refresh_token;
            }
            existing.updated_at = now;

            self.repo.update(existing.clone()).await?;
            info!(user_id = %existing.id, "linked account refreshed");
            return Ok(existing);
        }

        let user = User {
            id: Uuid::new_v4(),
            google_id: account.google_id,
            email: account.email,
            name: account.name,
            picture: account.picture,
            encrypted_access_token: account.encrypted_access_token,
            encrypted_refresh_token: account.encrypted_refresh_token,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(user.clone()).await?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }
}
