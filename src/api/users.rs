use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::db::User;

/// GET /users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.store().list_users().await?;
    Ok(Json(users))
}
