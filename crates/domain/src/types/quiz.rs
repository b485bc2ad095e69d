//! Quiz entities and the AI-generated question shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A quiz taken by a user, linked to a study subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub topic: String,
    pub total_questions: i32,
    pub correct_count: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A single multiple-choice question belonging to a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub content: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

/// A question produced by the LLM generator, before any persistence.
///
/// Field names follow the JSON contract of the generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    #[serde(rename = "tema")]
    pub topic: String,
    #[serde(rename = "dificuldade")]
    pub difficulty: String,
    #[serde(rename = "pergunta")]
    pub question: String,
    #[serde(rename = "alternativas")]
    pub options: Vec<String>,
    #[serde(rename = "resposta_correta")]
    pub correct_answer: String,
    #[serde(rename = "explicacao")]
    pub explanation: String,
}
