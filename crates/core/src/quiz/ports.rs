//! Port interface for quiz persistence.

use async_trait::async_trait;
use chronos_domain::{Quiz, QuizQuestion, Result};
use uuid::Uuid;

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Insert a quiz together with its questions atomically.
    async fn create_with_questions(&self, quiz: Quiz, questions: Vec<QuizQuestion>) -> Result<()>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Quiz>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn add_questions(&self, questions: Vec<QuizQuestion>) -> Result<()>;

    async fn list_questions_by_quiz(&self, quiz_id: Uuid) -> Result<Vec<QuizQuestion>>;

    async fn delete_question(&self, id: Uuid) -> Result<bool>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Quiz>>;
}
