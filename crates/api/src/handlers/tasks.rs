//! Task endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chronos_core::{NewTask, TaskUpdate};
use chronos_domain::{DashboardStats, Task};

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.tasks.create_task(user.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.tasks.list_by_user(user.user_id).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.tasks.find_by_id(user.user_id, id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.tasks.update_task(user.user_id, id, payload).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.tasks.delete_task(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.tasks.dashboard_stats(user.user_id).await?))
}

pub async fn list_by_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let project_id = parse_id(&project_id)?;
    Ok(Json(state.tasks.list_by_project(user.user_id, project_id).await?))
}

pub async fn list_by_topic(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(topic_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let topic_id = parse_id(&topic_id)?;
    Ok(Json(state.tasks.list_by_topic(user.user_id, topic_id).await?))
}
