use serde::{Deserialize, Serialize};

use crate::personalize::TokenUsage;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Create and update share the same shape.
#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template_name: String,
    pub template_body: String,
}

#[derive(Debug, Serialize)]
pub struct SampleTemplate {
    pub template_name: &'static str,
    pub template_body: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub template_body: String,
    pub user_id: i32,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub user_id: i32,
    pub rendered: String,
    pub tokens: Vec<TokenUsage>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub template_id: i32,
    pub user_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
