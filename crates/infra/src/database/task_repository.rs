//! Task repository implementation using SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use chronos_core::TaskRepository;
use chronos_domain::{Result as DomainResult, Task, TaskKind, TaskPriority, TaskStatus};
use rusqlite::{params, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{from_epoch, from_epoch_required, read_enum, read_uuid, read_uuid_opt, to_epoch};
use crate::errors::InfraError;

const TASK_COLUMNS: &str = "id, user_id, name, description, status, priority, kind, \
                            project_id, study_topic_id, start_date, due_date, done_at, \
                            external_event_id, created_at, updated_at";

/// SQLite-backed implementation of `TaskRepository`.
pub struct SqliteTaskRepository {
    db: Arc<DbManager>,
}

impl SqliteTaskRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: Task) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 15] = [
                &task.id.to_string(),
                &task.user_id.to_string(),
                &task.name,
                &task.description,
                &task.status.as_str(),
                &task.priority.as_str(),
                &task.kind.as_str(),
                &task.project_id.map(|id| id.to_string()),
                &task.study_topic_id.map(|id| id.to_string()),
                &to_epoch(task.start_date),
                &to_epoch(task.due_date),
                &to_epoch(task.done_at),
                &task.external_event_id,
                &task.created_at.timestamp(),
                &task.updated_at.timestamp(),
            ];

            conn.execute(
                "INSERT INTO tasks (id, user_id, name, description, status, priority, kind,
                                    project_id, study_topic_id, start_date, due_date, done_at,
                                    external_event_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params.as_slice(),
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn update(&self, task: Task) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 14] = [
                &task.name,
                &task.description,
                &task.status.as_str(),
                &task.priority.as_str(),
                &task.kind.as_str(),
                &task.project_id.map(|id| id.to_string()),
                &task.study_topic_id.map(|id| id.to_string()),
                &to_epoch(task.start_date),
                &to_epoch(task.due_date),
                &to_epoch(task.done_at),
                &task.external_event_id,
                &task.updated_at.timestamp(),
                &task.id.to_string(),
                &task.user_id.to_string(),
            ];

            conn.execute(
                "UPDATE tasks SET
                     name = ?1, description = ?2, status = ?3, priority = ?4, kind = ?5,
                     project_id = ?6, study_topic_id = ?7, start_date = ?8, due_date = ?9,
                     done_at = ?10, external_event_id = ?11, updated_at = ?12
                 WHERE id = ?13 AND user_id = ?14",
                params.as_slice(),
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let affected = conn
                .execute(
                    "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                    params![id.to_string(), user_id.to_string()],
                )
                .map_err(InfraError::from)?;
            Ok(affected > 0)
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> DomainResult<Option<Task>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Task>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"),
                params![id.to_string(), user_id.to_string()],
                map_task_row,
            );

            match result {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Task>> {
        self.query_tasks(
            format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY created_at DESC"),
            vec![user_id.to_string()],
        )
        .await
    }

    async fn list_by_project_and_user(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Vec<Task>> {
        self.query_tasks(
            format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE project_id = ?1 AND user_id = ?2 ORDER BY created_at DESC"
            ),
            vec![project_id.to_string(), user_id.to_string()],
        )
        .await
    }

    async fn list_by_topic_and_user(
        &self,
        topic_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Vec<Task>> {
        self.query_tasks(
            format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE study_topic_id = ?1 AND user_id = ?2 ORDER BY created_at DESC"
            ),
            vec![topic_id.to_string(), user_id.to_string()],
        )
        .await
    }
}

impl SqliteTaskRepository {
    async fn query_tasks(&self, sql: String, args: Vec<String>) -> DomainResult<Vec<Task>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Task>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(args.iter()), map_task_row)
                .map_err(InfraError::from)?;

            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(row.map_err(InfraError::from)?);
            }
            Ok(tasks)
        })
        .await
        .map_err(InfraError::from)?
    }
}

fn map_task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: read_uuid(row, 0)?,
        user_id: read_uuid(row, 1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        status: read_enum(row, 4, TaskStatus::parse)?,
        priority: read_enum(row, 5, TaskPriority::parse)?,
        kind: read_enum(row, 6, TaskKind::parse)?,
        project_id: read_uuid_opt(row, 7)?,
        study_topic_id: read_uuid_opt(row, 8)?,
        start_date: from_epoch(row.get(9)?),
        due_date: from_epoch(row.get(10)?),
        done_at: from_epoch(row.get(11)?),
        external_event_id: row.get(12)?,
        created_at: from_epoch_required(row.get(13)?),
        updated_at: from_epoch_required(row.get(14)?),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::*;

    fn setup_test_db() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(db_path, 4).expect("create db manager");
        manager.run_migrations().expect("run migrations");
        (Arc::new(manager), temp_dir)
    }

    fn seed_user(db: &Arc<DbManager>) -> Uuid {
        let id = Uuid::new_v4();
        let conn = db.get_connection().expect("connection");
        conn.execute(
            "INSERT INTO users (id, google_id, email, name, created_at, updated_at)
             VALUES (?1, ?2, 'test@example.com', 'Test User', 0, 0)",
            params![id.to_string(), Uuid::new_v4().to_string()],
        )
        .expect("seed user");
        id
    }

    fn test_task(user_id: Uuid) -> Task {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        Task {
            id: Uuid::new_v4(),
            user_id,
            name: "Write the report".into(),
            description: "quarterly numbers".into(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            kind: TaskKind::Event,
            project_id: None,
            study_topic_id: None,
            start_date: Some(now),
            due_date: None,
            done_at: None,
            external_event_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_and_find_round_trip() {
        let (db, _tmp) = setup_test_db();
        let user_id = seed_user(&db);
        let repo = SqliteTaskRepository::new(db);
        let task = test_task(user_id);

        repo.create(task.clone()).await.expect("create task");

        let found = repo
            .find_by_id_and_user(task.id, user_id)
            .await
            .expect("find task")
            .expect("task present");
        assert_eq!(found.name, task.name);
        assert_eq!(found.status, TaskStatus::Todo);
        assert_eq!(found.start_date, task.start_date);
        assert!(found.external_event_id.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn find_is_owner_scoped() {
        let (db, _tmp) = setup_test_db();
        let user_id = seed_user(&db);
        let other_user = seed_user(&db);
        let repo = SqliteTaskRepository::new(db);
        let task = test_task(user_id);

        repo.create(task.clone()).await.expect("create task");

        let found = repo.find_by_id_and_user(task.id, other_user).await.expect("query");
        assert!(found.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_persists_event_id() {
        let (db, _tmp) = setup_test_db();
        let user_id = seed_user(&db);
        let repo = SqliteTaskRepository::new(db);
        let mut task = test_task(user_id);

        repo.create(task.clone()).await.expect("create task");

        task.external_event_id = Some("evt-123".into());
        repo.update(task.clone()).await.expect("update task");

        let found =
            repo.find_by_id_and_user(task.id, user_id).await.expect("query").expect("present");
        assert_eq!(found.external_event_id.as_deref(), Some("evt-123"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_reports_whether_a_row_was_removed() {
        let (db, _tmp) = setup_test_db();
        let user_id = seed_user(&db);
        let repo = SqliteTaskRepository::new(db);
        let task = test_task(user_id);

        repo.create(task.clone()).await.expect("create task");

        assert!(repo.delete(task.id, user_id).await.expect("delete"));
        assert!(!repo.delete(task.id, user_id).await.expect("second delete"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_by_user_returns_only_owned_tasks() {
        let (db, _tmp) = setup_test_db();
        let user_id = seed_user(&db);
        let other_user = seed_user(&db);
        let repo = SqliteTaskRepository::new(db);

        repo.create(test_task(user_id)).await.expect("create 1");
        repo.create(test_task(user_id)).await.expect("create 2");
        repo.create(test_task(other_user)).await.expect("create other");

        let tasks = repo.list_by_user(user_id).await.expect("list");
        assert_eq!(tasks.len(), 2);
    }
}
