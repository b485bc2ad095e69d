//! Request handlers, one module per aggregate.

pub mod aiquiz;
pub mod auth;
pub mod goals;
pub mod projects;
pub mod quizzes;
pub mod study;
pub mod tasks;
pub mod users;

use chronos_domain::{ChronosError, Result};
use uuid::Uuid;

/// Parse a path id, rejecting malformed values before any lookup.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ChronosError::InvalidInput("invalid id format".into()))
}
