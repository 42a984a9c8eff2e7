//! Domain service for bulk template sends.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Template not found")]
    TemplateNotFound(i32),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for DispatchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliverySuccess {
    pub user_id: i32,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryFailure {
    pub user_id: i32,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryDetails {
    pub success: Vec<DeliverySuccess>,
    pub failed: Vec<DeliveryFailure>,
}

/// Outcome of one bulk send, as returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    /// `email_id` of the stored summary.
    pub id: i32,
    pub message: String,
    pub sent_at: String,
    /// Template name at the time of sending.
    pub template: String,
    pub success_count: i32,
    pub failed_count: i32,
    pub details: DeliveryDetails,
}

#[async_trait::async_trait]
pub trait DispatchService: Send + Sync {
    /// Sends the template to each recipient in order and records one summary.
    ///
    /// Per-recipient failures land in the report; only a missing template or
    /// a failure to store the summary is an error.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::TemplateNotFound`] before anything is sent.
    async fn send_template(
        &self,
        template_id: i32,
        user_ids: &[i32],
    ) -> Result<DispatchReport, DispatchError>;
}
