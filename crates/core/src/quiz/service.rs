//! Quiz CRUD service.

use std::sync::Arc;

use chrono::Utc;
use chronos_domain::{ChronosError, Quiz, QuizQuestion, Result};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::ports::QuizRepository;

/// A quiz together with its ordered questions.
#[derive(Debug, Clone, Serialize)]
pub struct QuizWithQuestions {
    pub quiz: Quiz,
    pub questions: Vec<QuizQuestion>,
}

pub struct QuizService {
    repo: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repo: Arc<dyn QuizRepository>) -> Self {
        Self { repo }
    }

    /// Persist a quiz and its questions in one step.
    ///
    /// Question ids and quiz linkage are assigned here; the provided order
    /// is preserved through `order_index`.
    pub async fn create_quiz(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
        topic: String,
        questions: Vec<QuizQuestion>,
    ) -> Result<QuizWithQuestions> {
        if questions.is_empty() {
            return Err(ChronosError::InvalidInput(
                "quiz must contain at least one question".into(),
            ));
        }

        let now = Utc::now();
        let quiz = Quiz {
            id: Uuid::new_v4(),
            user_id,
            subject_id,
            topic,
            total_questions: i32::try_from(questions.len()).unwrap_or(i32::MAX),
            correct_count: 0,
            completed_at: None,
            created_at: now,
        };

        let questions: Vec<QuizQuestion> = questions
            .into_iter()
            .enumerate()
            .map(|(index, mut question)| {
                question.id = Uuid::new_v4();
                question.quiz_id = quiz.id;
                question.order_index = i32::try_from(index).unwrap_or(i32::MAX);
                question.created_at = now;
                question
            })
            .collect();

        self.repo.create_with_questions(quiz.clone(), questions.clone()).await?;
        info!(quiz_id = %quiz.id, questions = questions.len(), "quiz created");

        Ok(QuizWithQuestions { quiz, questions })
    }

    pub async fn get_with_questions(&self, user_id: Uuid, id: Uuid) -> Result<QuizWithQuestions> {
        let quiz = self.find_owned(user_id, id).await?;
        let questions = self.repo.list_questions_by_quiz(id).await?;
        Ok(QuizWithQuestions { quiz, questions })
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Quiz>> {
        self.repo.list_by_user(user_id).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.find_owned(user_id, id).await?;
        self.repo.delete(id).await?;
        info!(quiz_id = %id, "quiz deleted");
        Ok(())
    }

    pub async fn add_question(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
        mut question: QuizQuestion,
    ) -> Result<QuizQuestion> {
        self.find_owned(user_id, quiz_id).await?;

        let existing = self.repo.list_questions_by_quiz(quiz_id).await?;
        question.id = Uuid::new_v4();
        question.quiz_id = quiz_id;
        question.order_index = i32::try_from(existing.len()).unwrap_or(i32::MAX);
        question.created_at = Utc::now();

        self.repo.add_questions(vec![question.clone()]).await?;
        info!(quiz_id = %quiz_id, question_id = %question.id, "question added");
        Ok(question)
    }

    pub async fn remove_question(&self, question_id: Uuid) -> Result<()> {
        if !self.repo.delete_question(question_id).await? {
            return Err(ChronosError::NotFound(format!("quiz question {question_id}")));
        }
        Ok(())
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Quiz> {
        let quiz = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ChronosError::NotFound(format!("quiz {id}")))?;

        if quiz.user_id != user_id {
            return Err(ChronosError::NotFound(format!("quiz {id}")));
        }

        Ok(quiz)
    }
}
