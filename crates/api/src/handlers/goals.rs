//! Annual goal endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chronos_core::{AnnualGoalUpdate, NewAnnualGoal};
use chronos_domain::AnnualGoal;

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewAnnualGoal>,
) -> Result<(StatusCode, Json<AnnualGoal>), ApiError> {
    let goal = state.goals.create(user.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<AnnualGoal>>, ApiError> {
    Ok(Json(state.goals.list(user.user_id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<AnnualGoalUpdate>,
) -> Result<Json<AnnualGoal>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.goals.update(user.user_id, id, payload).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.goals.delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
