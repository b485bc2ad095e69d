//! Study subject repository implementation using SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use chronos_core::StudySubjectRepository;
use chronos_domain::{Result as DomainResult, StudySubject};
use rusqlite::{params, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{from_epoch_required, read_uuid};
use crate::errors::InfraError;

const SUBJECT_COLUMNS: &str = "id, user_id, name, description, created_at, updated_at";

/// SQLite-backed implementation of `StudySubjectRepository`.
pub struct SqliteStudySubjectRepository {
    db: Arc<DbManager>,
}

impl SqliteStudySubjectRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudySubjectRepository for SqliteStudySubjectRepository {
    async fn create(&self, subject: StudySubject) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 6] = [
                &subject.id.to_string(),
                &subject.user_id.to_string(),
                &subject.name,
                &subject.description,
                &subject.created_at.timestamp(),
                &subject.updated_at.timestamp(),
            ];

            conn.execute(
                "INSERT INTO study_subjects (id, user_id, name, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params.as_slice(),
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn update(&self, subject: StudySubject) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE study_subjects SET name = ?1, description = ?2, updated_at = ?3
                 WHERE id = ?4 AND user_id = ?5",
                params![
                    subject.name,
                    subject.description,
                    subject.updated_at.timestamp(),
                    subject.id.to_string(),
                    subject.user_id.to_string()
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
                    "DELETE FROM study_subjects WHERE id = ?1 AND user_id = ?2",
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
    ) -> DomainResult<Option<StudySubject>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<StudySubject>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!(
                    "SELECT {SUBJECT_COLUMNS} FROM study_subjects WHERE id = ?1 AND user_id = ?2"
                ),
                params![id.to_string(), user_id.to_string()],
                map_subject_row,
            );

            match result {
                Ok(subject) => Ok(Some(subject)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<StudySubject>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<StudySubject>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SUBJECT_COLUMNS} FROM study_subjects
                     WHERE user_id = ?1 ORDER BY created_at DESC"
                ))
                .map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params![user_id.to_string()], map_subject_row)
                .map_err(InfraError::from)?;

            let mut subjects = Vec::new();
            for row in rows {
                subjects.push(row.map_err(InfraError::from)?);
            }
            Ok(subjects)
        })
        .await
        .map_err(InfraError::from)?
    }
}

fn map_subject_row(row: &Row<'_>) -> rusqlite::Result<StudySubject> {
    Ok(StudySubject {
        id: read_uuid(row, 0)?,
        user_id: read_uuid(row, 1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: from_epoch_required(row.get(4)?),
        updated_at: from_epoch_required(row.get(5)?),
    })
}
