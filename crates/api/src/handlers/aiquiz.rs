//! AI quiz generation endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chronos_core::QuestionRequest;
use chronos_domain::GeneratedQuestion;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn generate(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(payload): Json<QuestionRequest>,
) -> Result<(StatusCode, Json<Vec<GeneratedQuestion>>), ApiError> {
    let questions = state.ai_quiz.generate_questions(payload).await?;
    Ok((StatusCode::CREATED, Json(questions)))
}
