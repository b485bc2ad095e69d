//! SQLite persistence layer.

pub mod goal_repository;
pub mod manager;
pub mod project_repository;
pub mod quiz_repository;
pub mod study_subject_repository;
pub mod study_topic_repository;
pub mod task_repository;
pub mod user_repository;

pub use goal_repository::SqliteAnnualGoalRepository;
pub use manager::DbManager;
pub use project_repository::SqliteProjectRepository;
pub use quiz_repository::SqliteQuizRepository;
pub use study_subject_repository::SqliteStudySubjectRepository;
pub use study_topic_repository::SqliteStudyTopicRepository;
pub use task_repository::SqliteTaskRepository;
pub use user_repository::SqliteUserRepository;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

/// Convert an optional timestamp to epoch seconds for storage.
pub(crate) fn to_epoch(value: Option<DateTime<Utc>>) -> Option<i64> {
    value.map(|v| v.timestamp())
}

/// Convert stored epoch seconds back to a timestamp.
pub(crate) fn from_epoch(value: Option<i64>) -> Option<DateTime<Utc>> {
    value.and_then(|v| Utc.timestamp_opt(v, 0).single())
}

/// Convert required epoch seconds back to a timestamp.
pub(crate) fn from_epoch_required(value: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(value, 0).single().unwrap_or_else(Utc::now)
}

/// Read a UUID column from a row.
pub(crate) fn read_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let value: String = row.get(idx)?;
    Uuid::parse_str(&value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read an optional UUID column from a row.
pub(crate) fn read_uuid_opt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let value: Option<String> = row.get(idx)?;
    value
        .map(|v| {
            Uuid::parse_str(&v).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Read an enum-bearing TEXT column via the provided parser.
pub(crate) fn read_enum<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let value: String = row.get(idx)?;
    parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown enum value: {value}").into(),
        )
    })
}
