//! Annual goal repository implementation using SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use chronos_core::AnnualGoalRepository;
use chronos_domain::{AnnualGoal, AnnualGoalStatus, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{from_epoch_required, read_enum, read_uuid};
use crate::errors::InfraError;

const GOAL_COLUMNS: &str = "id, user_id, title, description, year, status, created_at, updated_at";

/// SQLite-backed implementation of `AnnualGoalRepository`.
pub struct SqliteAnnualGoalRepository {
    db: Arc<DbManager>,
}

impl SqliteAnnualGoalRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnnualGoalRepository for SqliteAnnualGoalRepository {
    async fn create(&self, goal: AnnualGoal) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 8] = [
                &goal.id.to_string(),
                &goal.user_id.to_string(),
                &goal.title,
                &goal.description,
                &goal.year,
                &goal.status.as_str(),
                &goal.created_at.timestamp(),
                &goal.updated_at.timestamp(),
            ];

            conn.execute(
                "INSERT INTO annual_goals (id, user_id, title, description, year, status,
                                           created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params.as_slice(),
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn update(&self, goal: AnnualGoal) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE annual_goals SET title = ?1, description = ?2, year = ?3, status = ?4,
                                         updated_at = ?5
                 WHERE id = ?6",
                params![
                    goal.title,
                    goal.description,
                    goal.year,
                    goal.status.as_str(),
                    goal.updated_at.timestamp(),
                    goal.id.to_string()
                ],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let affected = conn
                .execute("DELETE FROM annual_goals WHERE id = ?1", params![id.to_string()])
                .map_err(InfraError::from)?;
            Ok(affected > 0)
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<AnnualGoal>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<AnnualGoal>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {GOAL_COLUMNS} FROM annual_goals WHERE id = ?1"),
                params![id.to_string()],
                map_goal_row,
            );

            match result {
                Ok(goal) => Ok(Some(goal)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<AnnualGoal>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<AnnualGoal>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {GOAL_COLUMNS} FROM annual_goals
                     WHERE user_id = ?1 ORDER BY year DESC, created_at DESC"
                ))
                .map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params![user_id.to_string()], map_goal_row)
                .map_err(InfraError::from)?;

            let mut goals = Vec::new();
            for row in rows {
                goals.push(row.map_err(InfraError::from)?);
            }
            Ok(goals)
        })
        .await
        .map_err(InfraError::from)?
    }
}

fn map_goal_row(row: &Row<'_>) -> rusqlite::Result<AnnualGoal> {
    Ok(AnnualGoal {
        id: read_uuid(row, 0)?,
        user_id: read_uuid(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        year: row.get(4)?,
        status: read_enum(row, 5, AnnualGoalStatus::parse)?,
        created_at: from_epoch_required(row.get(6)?),
        updated_at: from_epoch_required(row.get(7)?),
    })
}
