//! Wire types for the Google Calendar v3 events API.

use chronos_domain::EventDraft;
use serde::{Deserialize, Serialize};

/// Event payload sent to the provider.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleEvent {
    pub summary: String,
    pub description: String,
    pub start: GoogleEventDateTime,
    pub end: GoogleEventDateTime,
    pub reminders: GoogleEventReminders,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleEventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleEventReminders {
    #[serde(rename = "useDefault")]
    pub use_default: bool,
}

impl From<&EventDraft> for GoogleEvent {
    fn from(draft: &EventDraft) -> Self {
        Self {
            summary: draft.summary.clone(),
            description: draft.description.clone(),
            start: GoogleEventDateTime { date_time: draft.start.to_rfc3339() },
            end: GoogleEventDateTime { date_time: draft.end.to_rfc3339() },
            reminders: GoogleEventReminders { use_default: false },
        }
    }
}

/// The subset of an inserted event the sync engine cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertedEvent {
    #[serde(default)]
    pub id: String,
}

/// OAuth token endpoint response for the refresh-token grant.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
}
