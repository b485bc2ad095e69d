//! Dashboard statistics payloads.

use serde::{Deserialize, Serialize};

use super::task::Task;

/// Task counts by workflow status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStatusStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub overdue: usize,
}

/// Task counts by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskKindStats {
    pub event: usize,
    pub study: usize,
    pub project: usize,
}

/// Aggregated dashboard response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub stats: TaskStatusStats,
    #[serde(rename = "type")]
    pub kind: TaskKindStats,
    /// Tasks with a due date inside the current month.
    pub month: Vec<Task>,
    /// Most recently created tasks.
    pub last_tasks: Vec<Task>,
}
