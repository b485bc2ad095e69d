//! Study topic repository implementation using SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use chronos_core::StudyTopicRepository;
use chronos_domain::{Result as DomainResult, StudyTopic};
use rusqlite::{params, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{from_epoch_required, read_uuid};
use crate::errors::InfraError;

const TOPIC_COLUMNS: &str = "id, user_id, subject_id, name, description, created_at, updated_at";

/// SQLite-backed implementation of `StudyTopicRepository`.
pub struct SqliteStudyTopicRepository {
    db: Arc<DbManager>,
}

impl SqliteStudyTopicRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudyTopicRepository for SqliteStudyTopicRepository {
    async fn create(&self, topic: StudyTopic) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 7] = [
                &topic.id.to_string(),
                &topic.user_id.to_string(),
                &topic.subject_id.to_string(),
                &topic.name,
                &topic.description,
                &topic.created_at.timestamp(),
                &topic.updated_at.timestamp(),
            ];

            conn.execute(
                "INSERT INTO study_topics (id, user_id, subject_id, name, description,
                                           created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params.as_slice(),
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn update(&self, topic: StudyTopic) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE study_topics SET name = ?1, description = ?2, updated_at = ?3
                 WHERE id = ?4 AND user_id = ?5",
                params![
                    topic.name,
                    topic.description,
                    topic.updated_at.timestamp(),
                    topic.id.to_string(),
                    topic.user_id.to_string()
                ],
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
                    "DELETE FROM study_topics WHERE id = ?1 AND user_id = ?2",
                    params![id.to_string(), user_id.to_string()],
                )
                .map_err(InfraError::from)?;
            Ok(affected > 0)
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn find_by_id_and_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Option<StudyTopic>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<StudyTopic>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!(
                    "SELECT {TOPIC_COLUMNS} FROM study_topics WHERE id = ?1 AND user_id = ?2"
                ),
                params![id.to_string(), user_id.to_string()],
                map_topic_row,
            );

            match result {
                Ok(topic) => Ok(Some(topic)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn list_by_subject_and_user(
        &self,
        subject_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Vec<StudyTopic>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<StudyTopic>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {TOPIC_COLUMNS} FROM study_topics
                     WHERE subject_id = ?1 AND user_id = ?2 ORDER BY created_at DESC"
                ))
                .map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params![subject_id.to_string(), user_id.to_string()], map_topic_row)
                .map_err(InfraError::from)?;

            let mut topics = Vec::new();
            for row in rows {
                topics.push(row.map_err(InfraError::from)?);
            }
            Ok(topics)
        })
        .await
        .map_err(InfraError::from)?
    }
}

fn map_topic_row(row: &Row<'_>) -> rusqlite::Result<StudyTopic> {
    Ok(StudyTopic {
        id: read_uuid(row, 0)?,
        user_id: read_uuid(row, 1)?,
        subject_id: read_uuid(row, 2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        created_at: from_epoch_required(row.get(5)?),
        updated_at: from_epoch_required(row.get(6)?),
    })
}
