//! Events client for the user's primary calendar.
//!
//! Implements the `CalendarGateway` port. Provider 404/410 responses on
//! update and delete are classified as "already gone" and reported as
//! success, which is what makes remote deletion idempotent.

use async_trait::async_trait;
use chronos_core::{CalendarError, CalendarGateway};
use chronos_domain::EventDraft;
use reqwest::{Method, Response, StatusCode};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::credentials::CredentialResolver;
use super::types::{GoogleEvent, InsertedEvent};
use crate::http::HttpClient;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const PRIMARY_CALENDAR: &str = "primary";

/// Google Calendar API client.
pub struct GoogleCalendarClient {
    resolver: CredentialResolver,
    http: HttpClient,
    api_base: String,
}

impl GoogleCalendarClient {
    pub fn new(resolver: CredentialResolver, http: HttpClient) -> Self {
        Self { resolver, http, api_base: CALENDAR_API_BASE.to_string() }
    }

    /// Override the API base URL (for testing).
    #[cfg(test)]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{PRIMARY_CALENDAR}/events", self.api_base)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{event_id}", self.events_url())
    }

    async fn execute(
        &self,
        user_id: Uuid,
        method: Method,
        url: String,
        event: Option<&EventDraft>,
    ) -> Result<Response, CalendarError> {
        let authorized = self.resolver.resolve(user_id).await?;

        let mut request =
            self.http.request(method, &url).bearer_auth(&authorized.access_token);
        if let Some(draft) = event {
            request = request.json(&GoogleEvent::from(draft));
        }

        self.http.send(request).await.map_err(|err| CalendarError::Provider(err.to_string()))
    }
}

/// A gone-from-the-remote response: the event was already deleted.
fn is_gone(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status == StatusCode::GONE
}

async fn provider_error(response: Response) -> CalendarError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    CalendarError::Provider(format!("calendar API returned {status}: {body}"))
}

#[async_trait]
impl CalendarGateway for GoogleCalendarClient {
    async fn insert(&self, user_id: Uuid, event: &EventDraft) -> Result<String, CalendarError> {
        let response =
            self.execute(user_id, Method::POST, self.events_url(), Some(event)).await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|err| CalendarError::Provider(format!("invalid insert response: {err}")))?;

        info!(event_id = %inserted.id, "calendar event inserted");
        Ok(inserted.id)
    }

    async fn update(
        &self,
        user_id: Uuid,
        event_id: &str,
        event: &EventDraft,
    ) -> Result<(), CalendarError> {
        let response =
            self.execute(user_id, Method::PUT, self.event_url(event_id), Some(event)).await?;

        let status = response.status();
        if is_gone(status) {
            warn!(event_id, "calendar event not found on update, treating as already deleted");
            return Ok(());
        }
        if !status.is_success() {
            return Err(provider_error(response).await);
        }

        debug!(event_id, "calendar event updated");
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, event_id: &str) -> Result<(), CalendarError> {
        let response =
            self.execute(user_id, Method::DELETE, self.event_url(event_id), None).await?;

        let status = response.status();
        if is_gone(status) {
            warn!(event_id, "calendar event not found on delete, treating as already deleted");
            return Ok(());
        }
        if !status.is_success() {
            return Err(provider_error(response).await);
        }

        debug!(event_id, "calendar event deleted");
        Ok(())
    }
}
