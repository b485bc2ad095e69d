//! Port interface for user persistence.

use async_trait::async_trait;
use chronos_domain::{Result, User};
use uuid::Uuid;

/// Trait for persisting users, including their encrypted calendar tokens.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn get_by_google_id(&self, google_id: &str) -> Result<Option<User>>;

    async fn create(&self, user: User) -> Result<()>;

    /// Update the full user record, including token ciphertexts.
    async fn update(&self, user: User) -> Result<()>;
}
