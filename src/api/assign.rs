use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use tracing::info;

use super::auth::AuthenticatedAdmin;
use super::{ApiError, AppState, AssignRequest};
use crate::services::DispatchReport;

/// POST /assign
/// Email a template to each listed user and return the per-recipient outcome.
pub async fn assign_template(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    payload: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<DispatchReport>, ApiError> {
    let Json(payload) = payload?;
    let template_id = payload.template_id;

    info!(
        admin_id = admin.admin_id,
        template_id,
        recipients = payload.user_ids.len(),
        "Bulk send requested"
    );

    let report = state
        .dispatch_service()
        .send_template(template_id, &payload.user_ids)
        .await?;

    Ok(Json(report))
}
