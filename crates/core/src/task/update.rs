//! Mutation payloads for task creation and update.

use chrono::{DateTime, Utc};
use chronos_domain::{TaskKind, TaskPriority, TaskStatus};
use serde::Deserialize;
use uuid::Uuid;

/// Payload for creating a task. The service assigns id, owner and
/// timestamps.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub kind: TaskKind,
    pub project_id: Option<Uuid>,
    pub study_topic_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Field-level update payload.
///
/// Every mutable attribute is wrapped in `Option` so that "absent" and
/// "present with a value" stay distinguishable. For name and description an
/// empty string additionally means "leave unchanged", never "clear". The
/// due date is the only clearable temporal field, via the explicit
/// `remove_due_date` flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remove_due_date: bool,
    pub done_at: Option<DateTime<Utc>>,
}
