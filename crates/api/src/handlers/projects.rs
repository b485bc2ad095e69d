//! Project endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chronos_core::{NewProject, ProjectUpdate};
use chronos_domain::Project;

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.projects.create(user.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.projects.list(user.user_id).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.projects.get(user.user_id, id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.projects.update(user.user_id, id, payload).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.projects.delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
