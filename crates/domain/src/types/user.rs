//! User entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user.
///
/// Calendar OAuth tokens are stored as AES-GCM ciphertexts and decrypted
/// only transiently for the duration of a single calendar call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    #[serde(skip_serializing, default)]
    pub encrypted_access_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub encrypted_refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
