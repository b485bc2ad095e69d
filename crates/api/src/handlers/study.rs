//! Study subject and topic endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chronos_core::{NewStudySubject, NewStudyTopic, StudyItemUpdate};
use chronos_domain::{StudySubject, StudyTopic};

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewStudySubject>,
) -> Result<(StatusCode, Json<StudySubject>), ApiError> {
    let subject = state.study.create_subject(user.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<StudySubject>>, ApiError> {
    Ok(Json(state.study.list_subjects(user.user_id).await?))
}

pub async fn get_subject(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StudySubject>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.study.get_subject(user.user_id, id).await?))
}

pub async fn update_subject(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<StudyItemUpdate>,
) -> Result<Json<StudySubject>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.study.update_subject(user.user_id, id, payload).await?))
}

pub async fn delete_subject(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.study.delete_subject(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_topics_by_subject(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(subject_id): Path<String>,
) -> Result<Json<Vec<StudyTopic>>, ApiError> {
    let subject_id = parse_id(&subject_id)?;
    Ok(Json(state.study.list_topics_by_subject(user.user_id, subject_id).await?))
}

pub async fn create_topic(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewStudyTopic>,
) -> Result<(StatusCode, Json<StudyTopic>), ApiError> {
    let topic = state.study.create_topic(user.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(topic)))
}

pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StudyTopic>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.study.get_topic(user.user_id, id).await?))
}

pub async fn update_topic(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<StudyItemUpdate>,
) -> Result<Json<StudyTopic>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.study.update_topic(user.user_id, id, payload).await?))
}

pub async fn delete_topic(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.study.delete_topic(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
