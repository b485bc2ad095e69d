//! Project repository implementation using SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use chronos_core::ProjectRepository;
use chronos_domain::{Project, ProjectStatus, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{from_epoch_required, read_enum, read_uuid};
use crate::errors::InfraError;

const PROJECT_COLUMNS: &str = "id, user_id, name, description, status, created_at, updated_at";

/// SQLite-backed implementation of `ProjectRepository`.
pub struct SqliteProjectRepository {
    db: Arc<DbManager>,
}

impl SqliteProjectRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn create(&self, project: Project) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 7] = [
                &project.id.to_string(),
                &project.user_id.to_string(),
                &project.name,
                &project.description,
                &project.status.as_str(),
                &project.created_at.timestamp(),
                &project.updated_at.timestamp(),
            ];

            conn.execute(
                "INSERT INTO projects (id, user_id, name, description, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params.as_slice(),
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn update(&self, project: Project) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 6] = [
                &project.name,
                &project.description,
                &project.status.as_str(),
                &project.updated_at.timestamp(),
                &project.id.to_string(),
                &project.user_id.to_string(),
            ];

            conn.execute(
                "UPDATE projects SET name = ?1, description = ?2, status = ?3, updated_at = ?4
                 WHERE id = ?5 AND user_id = ?6",
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
                    "DELETE FROM projects WHERE id = ?1 AND user_id = ?2",
                    params![id.to_string(), user_id.to_string()],
                )
                .map_err(InfraError::from)?;
            Ok(affected > 0)
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> DomainResult<Option<Project>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Project>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1 AND user_id = ?2"),
                params![id.to_string(), user_id.to_string()],
                map_project_row,
            );

            match result {
                Ok(project) => Ok(Some(project)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Project>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Project>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects
                     WHERE user_id = ?1 ORDER BY created_at DESC"
                ))
                .map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params![user_id.to_string()], map_project_row)
                .map_err(InfraError::from)?;

            let mut projects = Vec::new();
            for row in rows {
                projects.push(row.map_err(InfraError::from)?);
            }
            Ok(projects)
        })
        .await
        .map_err(InfraError::from)?
    }
}

fn map_project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: read_uuid(row, 0)?,
        user_id: read_uuid(row, 1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        status: read_enum(row, 4, ProjectStatus::parse)?,
        created_at: from_epoch_required(row.get(5)?),
        updated_at: from_epoch_required(row.get(6)?),
    })
}
