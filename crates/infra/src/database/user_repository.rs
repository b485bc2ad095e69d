//! User repository implementation using SQLite.
//!
//! Stores the AES-GCM ciphertexts of the user's calendar tokens alongside
//! the profile fields; decryption happens in the credential resolver.

use std::sync::Arc;

use async_trait::async_trait;
use chronos_core::UserRepository;
use chronos_domain::{Result as DomainResult, User};
use rusqlite::{params, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{from_epoch_required, read_uuid};
use crate::errors::InfraError;

const USER_COLUMNS: &str = "id, google_id, email, name, picture, encrypted_access_token, \
                            encrypted_refresh_token, created_at, updated_at";

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn find_one(&self, sql: String, key: String) -> DomainResult<Option<User>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<User>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(&sql, params![key], map_user_row);

            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(InfraError::from)?
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        self.find_one(
            format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            id.to_string(),
        )
        .await
    }

    async fn get_by_google_id(&self, google_id: &str) -> DomainResult<Option<User>> {
        self.find_one(
            format!("SELECT {USER_COLUMNS} FROM users WHERE google_id = ?1"),
            google_id.to_string(),
        )
        .await
    }

    async fn create(&self, user: User) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 9] = [
                &user.id.to_string(),
                &user.google_id,
                &user.email,
                &user.name,
                &user.picture,
                &user.encrypted_access_token,
                &user.encrypted_refresh_token,
                &user.created_at.timestamp(),
                &user.updated_at.timestamp(),
            ];

            conn.execute(
                "INSERT INTO users (id, google_id, email, name, picture,
                                    encrypted_access_token, encrypted_refresh_token,
                                    created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params.as_slice(),
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }

    async fn update(&self, user: User) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 8] = [
                &user.email,
                &user.name,
                &user.picture,
                &user.encrypted_access_token,
                &user.encrypted_refresh_token,
                &user.updated_at.timestamp(),
                &user.id.to_string(),
                &user.google_id,
            ];

            conn.execute(
                "UPDATE users SET
                     email = ?1, name = ?2, picture = ?3,
                     encrypted_access_token = ?4, encrypted_refresh_token = ?5, updated_at = ?6
                 WHERE id = ?7 AND google_id = ?8",
                params.as_slice(),
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: read_uuid(row, 0)?,
        google_id: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        picture: row.get(4)?,
        encrypted_access_token: row.get(5)?,
        encrypted_refresh_token: row.get(6)?,
        created_at: from_epoch_required(row.get(7)?),
        updated_at: from_epoch_required(row.get(8)?),
    })
}
