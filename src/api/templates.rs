use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use std::sync::Arc;
use tracing::info;

use super::validation::validate_template_name;
use super::{
    ApiError, AppState, DeletedResponse, PreviewRequest, PreviewResponse, SampleTemplate,
    TemplateRequest,
};
use crate::db::Template;
use crate::personalize::{personalize, tokens_in};

const SAMPLE_TEMPLATE: SampleTemplate = SampleTemplate {
    template_name: "Sample Personalized Template",
    template_body: "Hello {{name}},\n\nThis is a simple template showing how personalization works.\nYou can use {{name}} anywhere in your template to include the user's name.\n\nBest regards,\nYour Team",
};

/// GET /templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Template>>, ApiError> {
    let templates = state.store().list_templates().await?;
    Ok(Json(templates))
}

/// GET /templates/sample
pub async fn sample_template() -> Json<SampleTemplate> {
    Json(SAMPLE_TEMPLATE)
}

/// POST /templates
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TemplateRequest>, JsonRejection>,
) -> Result<Json<Template>, ApiError> {
    let Json(payload) = payload?;
    let name = validate_template_name(&payload.template_name)?;

    let template = state
        .store()
        .create_template(name, &payload.template_body)
        .await?;

    Ok(Json(template))
}

/// PUT /templates/{id}
pub async fn update_template(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<TemplateRequest>, JsonRejection>,
) -> Result<Json<Template>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let name = validate_template_name(&payload.template_name)?;

    let template = state
        .store()
        .update_template(id, name, &payload.template_body)
        .await?
        .ok_or_else(|| ApiError::not_found("Template not found"))?;

    info!(template_id = id, "Template updated");
    Ok(Json(template))
}

/// DELETE /templates/{id}
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(id) = id?;

    if !state.store().delete_template(id).await? {
        return Err(ApiError::not_found("Template not found"));
    }

    Ok(Json(DeletedResponse { deleted: true }))
}

/// POST /templates/preview
/// Render a body for one user without sending anything.
pub async fn preview_template(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let Json(payload) = payload?;
    let user_id = payload.user_id;

    let user = state
        .store()
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(PreviewResponse {
        user_id,
        rendered: personalize(&payload.template_body, &user),
        tokens: tokens_in(&payload.template_body),
    }))
}
