//! Calendar-facing projections of a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transient snapshot of a task as seen by the calendar components.
///
/// Built fresh from the authoritative [`super::Task`] on every sync call;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarTask {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub external_event_id: Option<String>,
}

impl CalendarTask {
    /// Whether at least one temporal field is set.
    pub fn has_valid_dates(&self) -> bool {
        self.start_date.is_some() || self.due_date.is_some()
    }

    /// The mirrored event id, if one is recorded and non-empty.
    pub fn event_id(&self) -> Option<&str> {
        self.external_event_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Provider-agnostic event representation produced by the event mapper.
///
/// Start and end are always both populated; the wire encoding additionally
/// disables default reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
