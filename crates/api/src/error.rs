//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chronos_domain::ChronosError;
use serde_json::json;
use tracing::error;

/// Transport-layer error wrapper.
#[derive(Debug)]
pub struct ApiError(pub ChronosError);

impl From<ChronosError> for ApiError {
    fn from(err: ChronosError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ChronosError::InvalidInput(_) | ChronosError::ProjectRequired => {
                StatusCode::BAD_REQUEST
            }
            ChronosError::Unauthorized | ChronosError::Auth(_) => StatusCode::UNAUTHORIZED,
            ChronosError::NotFound(_)
            | ChronosError::ProjectNotFound
            | ChronosError::StudyTopicNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
            // Internals stay in the logs; clients get a generic message.
            return (status, Json(json!({ "error": "internal server error" }))).into_response();
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
