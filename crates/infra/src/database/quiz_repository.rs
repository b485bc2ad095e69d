//! Quiz repository implementation using SQLite.
//!
//! Question options are serialized as a JSON array into a TEXT column. Quiz
//! creation inserts the quiz and all of its questions inside one
//! transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chronos_core::QuizRepository;
use chronos_domain::{Quiz, QuizQuestion, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{from_epoch, from_epoch_required, read_uuid, to_epoch};
use crate::errors::InfraError;

const QUIZ_COLUMNS: &str =
    "id, user_id, subject_id, topic, total_questions, correct_count, completed_at, created_at";
const QUESTION_COLUMNS: &str =
    "id, quiz_id, content, options, correct_answer, explanation, order_index, created_at";

/// SQLite-backed implementation of `QuizRepository`.
pub struct SqliteQuizRepository {
    db: Arc<DbManager>,
}

impl SqliteQuizRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuizRepository for SqliteQuizRepository {
    async fn create_with_questions(
        &self,
        quiz: Quiz,
        questions: Vec<QuizQuestion>,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(InfraError::from)?;

            {
                let params: [&dyn ToSql; 8] = [
                    &quiz.id.to_string(),
                    &quiz.user_id.to_string(),
                    &quiz.subject_id.to_string(),
                    &quiz.topic,
                    &quiz.total_questions,
                    &quiz.correct_count,
                    &to_epoch(quiz.completed_at),
                    &quiz.created_at.timestamp(),
                ];
                tx.execute(
                    "INSERT INTO quizzes (id, user_id, subject_id, topic, total_questions,
                                          correct_count, completed_at, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params.as_slice(),
                )
                .map_err(InfraError::from)?;

                for question in &questions {
                    insert_question(&tx, question)?;
                }
            }

            tx.commit().map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<Quiz>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Quiz>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = ?1"),
                params![id.to_string()],
                map_quiz_row,
            );

            match result {
                Ok(quiz) => Ok(Some(quiz)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let affected = conn
                .execute("DELETE FROM quizzes WHERE id = ?1", params![id.to_string()])
                .map_err(InfraError::from)?;
            Ok(affected > 0)
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn add_questions(&self, questions: Vec<QuizQuestion>) -> DomainResult<()> {
        if questions.is_empty() {
            return Ok(());
        }

        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(InfraError::from)?;
            for question in &questions {
                insert_question(&tx, question)?;
            }
            tx.commit().map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn list_questions_by_quiz(&self, quiz_id: Uuid) -> DomainResult<Vec<QuizQuestion>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<QuizQuestion>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {QUESTION_COLUMNS} FROM quiz_questions
                     WHERE quiz_id = ?1 ORDER BY order_index ASC"
                ))
                .map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params![quiz_id.to_string()], map_question_row)
                .map_err(InfraError::from)?;

            let mut questions = Vec::new();
            for row in rows {
                questions.push(row.map_err(InfraError::from)?);
            }
            Ok(questions)
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn delete_question(&self, id: Uuid) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let affected = conn
                .execute("DELETE FROM quiz_questions WHERE id = ?1", params![id.to_string()])
                .map_err(InfraError::from)?;
            Ok(affected > 0)
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Quiz>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Quiz>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {QUIZ_COLUMNS} FROM quizzes
                     WHERE user_id = ?1 ORDER BY created_at DESC"
                ))
                .map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params![user_id.to_string()], map_quiz_row)
                .map_err(InfraError::from)?;

            let mut quizzes = Vec::new();
            for row in rows {
                quizzes.push(row.map_err(InfraError::from)?);
            }
            Ok(quizzes)
        })
        .await
        .map_err(InfraError::from)?
    }
}

fn insert_question(
    tx: &rusqlite::Transaction<'_>,
    question: &QuizQuestion,
) -> DomainResult<()> {
    let options = serde_json::to_string(&question.options)
        .map_err(|e| chronos_domain::ChronosError::Internal(format!("serialize options: {e}")))?;

    let params: [&dyn ToSql; 8] = [
        &question.id.to_string(),
        &question.quiz_id.to_string(),
        &question.content,
        &options,
        &question.correct_answer,
        &question.explanation,
        &question.order_index,
        &question.created_at.timestamp(),
    ];

    tx.execute(
        "INSERT INTO quiz_questions (id, quiz_id, content, options, correct_answer,
                                     explanation, order_index, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params.as_slice(),
    )
    .map_err(InfraError::from)?;
    Ok(())
}

fn map_quiz_row(row: &Row<'_>) -> rusqlite::Result<Quiz> {
    Ok(Quiz {
        id: read_uuid(row, 0)?,
        user_id: read_uuid(row, 1)?,
        subject_id: read_uuid(row, 2)?,
        topic: row.get(3)?,
        total_questions: row.get(4)?,
        correct_count: row.get(5)?,
        completed_at: from_epoch(row.get(6)?),
        created_at: from_epoch_required(row.get(7)?),
    })
}

fn map_question_row(row: &Row<'_>) -> rusqlite::Result<QuizQuestion> {
    let options_json: String = row.get(3)?;
    let options: Vec<String> = serde_json::from_str(&options_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(QuizQuestion {
        id: read_uuid(row, 0)?,
        quiz_id: read_uuid(row, 1)?,
        content: row.get(2)?,
        options,
        correct_answer: row.get(4)?,
        explanation: row.get(5)?,
        order_index: row.get(6)?,
        created_at: from_epoch_required(row.get(7)?),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (Arc<DbManager>, TempDir, Uuid, Uuid) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(db_path, 4).expect("create db manager");
        manager.run_migrations().expect("run migrations");

        let user_id = Uuid::new_v4();
        let subject_id = Uuid::new_v4();
        let conn = manager.get_connection().expect("connection");
        conn.execute(
            "INSERT INTO users (id, google_id, email, name, created_at, updated_at)
             VALUES (?1, ?2, 'q@example.com', 'Q', 0, 0)",
            params![user_id.to_string(), Uuid::new_v4().to_string()],
        )
        .expect("seed user");
        conn.execute(
            "INSERT INTO study_subjects (id, user_id, name, description, created_at, updated_at)
             VALUES (?1, ?2, 'History', '', 0, 0)",
            params![subject_id.to_string(), user_id.to_string()],
        )
        .expect("seed subject");

        (Arc::new(manager), temp_dir, user_id, subject_id)
    }

    fn test_quiz(user_id: Uuid, subject_id: Uuid) -> (Quiz, Vec<QuizQuestion>) {
        let now = Utc::now();
        let quiz = Quiz {
            id: Uuid::new_v4(),
            user_id,
            subject_id,
            topic: "French Revolution".into(),
            total_questions: 2,
            correct_count: 0,
            completed_at: None,
            created_at: now,
        };

        let questions = (0..2)
            .map(|i| QuizQuestion {
                id: Uuid::new_v4(),
                quiz_id: quiz.id,
                content: format!("Question {i}"),
                options: vec!["A) x".into(), "B) y".into(), "C) z".into(), "D) w".into()],
                correct_answer: "B".into(),
                explanation: Some("because".into()),
                order_index: i,
                created_at: now,
            })
            .collect();

        (quiz, questions)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_with_questions_round_trip() {
        let (db, _tmp, user_id, subject_id) = setup();
        let repo = SqliteQuizRepository::new(db);
        let (quiz, questions) = test_quiz(user_id, subject_id);

        repo.create_with_questions(quiz.clone(), questions).await.expect("create quiz");

        let found = repo.get_by_id(quiz.id).await.expect("get quiz").expect("present");
        assert_eq!(found.topic, "French Revolution");

        let listed = repo.list_questions_by_quiz(quiz.id).await.expect("list questions");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].order_index, 0);
        assert_eq!(listed[0].options.len(), 4);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn deleting_quiz_cascades_to_questions() {
        let (db, _tmp, user_id, subject_id) = setup();
        let repo = SqliteQuizRepository::new(db);
        let (quiz, questions) = test_quiz(user_id, subject_id);

        repo.create_with_questions(quiz.clone(), questions).await.expect("create quiz");
        assert!(repo.delete(quiz.id).await.expect("delete quiz"));

        let listed = repo.list_questions_by_quiz(quiz.id).await.expect("list questions");
        assert!(listed.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_question_removes_a_single_row() {
        let (db, _tmp, user_id, subject_id) = setup();
        let repo = SqliteQuizRepository::new(db);
        let (quiz, questions) = test_quiz(user_id, subject_id);
        let first_question = questions[0].id;

        repo.create_with_questions(quiz.clone(), questions).await.expect("create quiz");
        assert!(repo.delete_question(first_question).await.expect("delete question"));

        let listed = repo.list_questions_by_quiz(quiz.id).await.expect("list questions");
        assert_eq!(listed.len(), 1);
    }
}
