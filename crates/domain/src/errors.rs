//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Chronos
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ChronosError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Project not found")]
    ProjectNotFound,

    #[error("Study topic not found")]
    StudyTopicNotFound,

    #[error("A project id is required for PROJECT tasks")]
    ProjectRequired,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Chronos operations
pub type Result<T> = std::result::Result<T, ChronosError>;
