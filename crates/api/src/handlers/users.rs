//! User profile endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chronos_domain::User;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get_profile(user.user_id).await?))
}
