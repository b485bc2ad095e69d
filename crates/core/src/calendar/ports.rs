//! Port interfaces for the external calendar provider.
//!
//! These traits define the boundary between the reconciliation logic and
//! the provider-specific infrastructure implementation.

use async_trait::async_trait;
use chronos_domain::EventDraft;
use thiserror::Error;
use uuid::Uuid;

/// Failures of the calendar integration.
///
/// Credential failures and provider failures share this type because the
/// task service treats them uniformly: a user who never connected a
/// calendar account can still fully manage tasks.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("user not found for calendar integration")]
    UserNotFound,

    #[error("user has no stored calendar access token")]
    MissingCredentials,

    #[error("failed to decrypt stored calendar token")]
    DecryptionFailed,

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("calendar event not found")]
    EventNotFound,

    #[error("calendar provider error: {0}")]
    Provider(String),

    #[error("calendar integration error: {0}")]
    Internal(String),
}

/// Trait for calendar provider operations on the user's primary calendar.
///
/// Implementations resolve and refresh the user's stored credentials on
/// every call; no authorized client is cached across requests. `update` and
/// `delete` must treat a provider "resource not found" response as a
/// successful no-op (the remote event is already gone).
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Insert a new event, returning the provider-assigned event id.
    async fn insert(&self, user_id: Uuid, event: &EventDraft) -> Result<String, CalendarError>;

    /// Update an existing event in place.
    async fn update(
        &self,
        user_id: Uuid,
        event_id: &str,
        event: &EventDraft,
    ) -> Result<(), CalendarError>;

    /// Delete an event.
    async fn delete(&self, user_id: Uuid, event_id: &str) -> Result<(), CalendarError>;
}
