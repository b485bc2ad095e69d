//! Task service - persistence orchestration plus best-effort calendar sync.
//!
//! Every mutation follows the same two-phase sequence: the task row is
//! persisted first, then the calendar mirror is reconciled, then the row is
//! persisted a second time if the mirror's event id changed. No transaction
//! spans the two writes; a crash in between leaves the task persisted
//! without its event id, which the next date-touching update repairs.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use chronos_domain::constants::DASHBOARD_TASK_LIMIT;
use chronos_domain::{
    CalendarTask, ChronosError, DashboardStats, Result, Task, TaskKind, TaskStatus,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::ports::TaskRepository;
use super::update::{NewTask, TaskUpdate};
use crate::calendar::manager::CalendarManager;
use crate::project::ports::ProjectRepository;
use crate::study::ports::StudyTopicRepository;

pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    project_repo: Arc<dyn ProjectRepository>,
    topic_repo: Arc<dyn StudyTopicRepository>,
    calendar: Arc<CalendarManager>,
}

impl TaskService {
    pub fn new(
        repo: Arc<dyn TaskRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        topic_repo: Arc<dyn StudyTopicRepository>,
        calendar: Arc<CalendarManager>,
    ) -> Self {
        Self { repo, project_repo, topic_repo, calendar }
    }

    /// Create a task, then mirror it into the calendar as a side effect.
    ///
    /// Calendar failures never fail the creation: the task is returned as
    /// persisted, with or without an attached event id.
    #[instrument(skip(self, new_task), fields(user_id = %user_id))]
    pub async fn create_task(&self, user_id: Uuid, new_task: NewTask) -> Result<Task> {
        let now = Utc::now();
        let mut task = Task {
            id: Uuid::new_v4(),
            user_id,
            name: new_task.name,
            description: new_task.description,
            status: new_task.status,
            priority: new_task.priority,
            kind: new_task.kind,
            project_id: new_task.project_id,
            study_topic_id: new_task.study_topic_id,
            start_date: new_task.start_date,
            due_date: new_task.due_date,
            done_at: None,
            external_event_id: None,
            created_at: now,
            updated_at: now,
        };

        self.validate_dependencies(user_id, &task).await?;

        self.repo.create(task.clone()).await.map_err(|err| {
            error!(error = %err, "failed to create task");
            err
        })?;

        self.sync_with_calendar(user_id, &mut task).await;

        info!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// Apply a field-level update, syncing the calendar only when a
    /// calendar-relevant field actually changed.
    #[instrument(skip(self, update), fields(user_id = %user_id, task_id = %id))]
    pub async fn update_task(&self, user_id: Uuid, id: Uuid, update: TaskUpdate) -> Result<Task> {
        let mut task = self.find_task(id, user_id).await?;

        let needs_calendar_sync = apply_updates(&mut task, &update);
        task.updated_at = Utc::now();

        self.repo.update(task.clone()).await.map_err(|err| {
            error!(error = %err, "failed to update task");
            err
        })?;

        if needs_calendar_sync {
            self.sync_with_calendar(user_id, &mut task).await;
        }

        info!(task_id = %task.id, "task updated");
        Ok(task)
    }

    /// Delete a task, then remove its mirrored event as best-effort cleanup.
    #[instrument(skip(self), fields(user_id = %user_id, task_id = %id))]
    pub async fn delete_task(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let task = self.find_task(id, user_id).await?;

        let deleted = self.repo.delete(id, user_id).await.map_err(|err| {
            error!(error = %err, "failed to delete task");
            err
        })?;
        if !deleted {
            return Err(ChronosError::NotFound(format!("task {id}")));
        }

        if let Some(event_id) = task.external_event_id.as_deref().filter(|e| !e.is_empty()) {
            // Deletion already succeeded; cleanup failures stay in the logs.
            let _ = self.calendar.remove_task(user_id, event_id).await;
        }

        info!(task_id = %id, "task deleted");
        Ok(())
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Task> {
        self.find_task(id, user_id).await
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Task>> {
        self.repo.list_by_user(user_id).await
    }

    pub async fn list_by_project(&self, user_id: Uuid, project_id: Uuid) -> Result<Vec<Task>> {
        if self.project_repo.find_by_id_and_user(project_id, user_id).await?.is_none() {
            return Err(ChronosError::ProjectNotFound);
        }
        self.repo.list_by_project_and_user(project_id, user_id).await
    }

    pub async fn list_by_topic(&self, user_id: Uuid, topic_id: Uuid) -> Result<Vec<Task>> {
        if self.topic_repo.find_by_id_and_user(topic_id, user_id).await?.is_none() {
            return Err(ChronosError::StudyTopicNotFound);
        }
        self.repo.list_by_topic_and_user(topic_id, user_id).await
    }

    /// Aggregate the owner's tasks into the dashboard payload.
    pub async fn dashboard_stats(&self, user_id: Uuid) -> Result<DashboardStats> {
        let tasks = self.repo.list_by_user(user_id).await?;
        Ok(build_dashboard_stats(tasks))
    }

    async fn find_task(&self, id: Uuid, user_id: Uuid) -> Result<Task> {
        match self.repo.find_by_id_and_user(id, user_id).await? {
            Some(task) => Ok(task),
            None => {
                warn!(task_id = %id, user_id = %user_id, "task not found or unauthorized");
                Err(ChronosError::NotFound(format!("task {id}")))
            }
        }
    }

    async fn validate_dependencies(&self, user_id: Uuid, task: &Task) -> Result<()> {
        if task.kind == TaskKind::Project && task.project_id.is_none() {
            return Err(ChronosError::ProjectRequired);
        }

        if let Some(project_id) = task.project_id {
            if self.project_repo.find_by_id_and_user(project_id, user_id).await?.is_none() {
                return Err(ChronosError::ProjectNotFound);
            }
        }

        if let Some(topic_id) = task.study_topic_id {
            if self.topic_repo.find_by_id_and_user(topic_id, user_id).await?.is_none() {
                return Err(ChronosError::StudyTopicNotFound);
            }
        }

        Ok(())
    }

    /// Reconcile the calendar mirror and persist a changed event id.
    ///
    /// Purely best-effort: any failure here is logged and the caller's
    /// operation proceeds untouched.
    async fn sync_with_calendar(&self, user_id: Uuid, task: &mut Task) {
        let snapshot = to_calendar_task(task);
        let outcome = self.calendar.sync_task(user_id, &snapshot).await;

        if let Some(err) = outcome.error {
            warn!(task_id = %task.id, error = %err, "calendar sync failed");
            return;
        }

        let new_event_id =
            if outcome.event_id.is_empty() { None } else { Some(outcome.event_id) };

        if new_event_id != task.external_event_id {
            task.external_event_id = new_event_id;
            if let Err(err) = self.repo.update(task.clone()).await {
                error!(task_id = %task.id, error = %err, "failed to persist calendar event id");
            }
        }
    }
}

/// Project the authoritative task into the calendar-facing snapshot.
fn to_calendar_task(task: &Task) -> CalendarTask {
    CalendarTask {
        id: task.id,
        name: task.name.clone(),
        description: task.description.clone(),
        start_date: task.start_date,
        due_date: task.due_date,
        external_event_id: task.external_event_id.clone(),
    }
}

/// Apply the update in place, returning whether a calendar-relevant field
/// changed. Status, priority and done-at are pure metadata and never
/// trigger a sync.
fn apply_updates(task: &mut Task, update: &TaskUpdate) -> bool {
    let mut needs_sync = false;

    if let Some(name) = update.name.as_deref() {
        if !name.is_empty() && name != task.name {
            task.name = name.to_string();
            needs_sync = true;
        }
    }

    if let Some(description) = update.description.as_deref() {
        if !description.is_empty() && description != task.description {
            task.description = description.to_string();
            needs_sync = true;
        }
    }

    if let Some(status) = update.status {
        task.status = status;
    }

    if let Some(priority) = update.priority {
        task.priority = priority;
    }

    if let Some(start) = update.start_date {
        if task.start_date != Some(start) {
            task.start_date = Some(start);
            needs_sync = true;
        }
    }

    if update.remove_due_date {
        if task.due_date.is_some() {
            task.due_date = None;
            needs_sync = true;
        }
    } else if let Some(due) = update.due_date {
        if task.due_date != Some(due) {
            task.due_date = Some(due);
            needs_sync = true;
        }
    }

    if let Some(done_at) = update.done_at {
        task.done_at = Some(done_at);
    }

    needs_sync
}

fn build_dashboard_stats(tasks: Vec<Task>) -> DashboardStats {
    use chronos_domain::{TaskKindStats, TaskStatusStats};

    let now = Utc::now();
    let mut stats = TaskStatusStats { total: tasks.len(), ..TaskStatusStats::default() };
    let mut kind = TaskKindStats::default();
    let mut month = Vec::new();

    for task in &tasks {
        match task.status {
            TaskStatus::Todo => stats.todo += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Done => stats.done += 1,
        }
        if task.status != TaskStatus::Done {
            if let Some(due) = task.due_date {
                if due < now {
                    stats.overdue += 1;
                }
            }
        }

        match task.kind {
            TaskKind::Event => kind.event += 1,
            TaskKind::Study => kind.study += 1,
            TaskKind::Project => kind.project += 1,
        }

        if let Some(due) = task.due_date {
            if due.year() == now.year() && due.month() == now.month() {
                month.push(task.clone());
            }
        }
    }

    let mut last_tasks = tasks;
    last_tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    last_tasks.truncate(DASHBOARD_TASK_LIMIT);

    DashboardStats { stats, kind, month, last_tasks }
}
