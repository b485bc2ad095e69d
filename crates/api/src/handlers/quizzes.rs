//! Quiz endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use chronos_core::QuizWithQuestions;
use chronos_domain::{ChronosError, Quiz, QuizQuestion};
use serde::Deserialize;
use uuid::Uuid;

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Incoming question payload; ids and ordering are assigned server-side.
#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    pub content: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    pub subject_id: Uuid,
    pub topic: String,
    pub questions: Vec<QuestionInput>,
}

impl QuestionInput {
    fn into_question(self) -> QuizQuestion {
        QuizQuestion {
            id: Uuid::nil(),
            quiz_id: Uuid::nil(),
            content: self.content,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            order_index: 0,
            created_at: Utc::now(),
        }
    }
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<QuizWithQuestions>), ApiError> {
    if payload.questions.is_empty() {
        return Err(ApiError(ChronosError::InvalidInput(
            "quiz must contain at least one question".into(),
        )));
    }

    let questions = payload.questions.into_iter().map(QuestionInput::into_question).collect();
    let created = state
        .quizzes
        .create_quiz(user.user_id, payload.subject_id, payload.topic, questions)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Quiz>>, ApiError> {
    Ok(Json(state.quizzes.list_by_user(user.user_id).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<QuizWithQuestions>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.quizzes.get_with_questions(user.user_id, id).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.quizzes.delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_question(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<QuestionInput>,
) -> Result<(StatusCode, Json<QuizQuestion>), ApiError> {
    let quiz_id = parse_id(&id)?;
    let question =
        state.quizzes.add_question(user.user_id, quiz_id, payload.into_question()).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn remove_question(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(question_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let question_id = parse_id(&question_id)?;
    state.quizzes.remove_question(question_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
