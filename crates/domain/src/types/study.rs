//! Study subject and topic entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A broad area of study (e.g. "Mathematics").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySubject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A topic within a study subject (e.g. "Linear Algebra").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyTopic {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
