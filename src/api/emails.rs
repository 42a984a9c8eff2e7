use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::db::SentEmail;

pub const HISTORY_LIMIT: u64 = 50;

/// GET /emails/history
pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SentEmail>>, ApiError> {
    let history = state.store().recent_sends(HISTORY_LIMIT).await?;
    Ok(Json(history))
}
