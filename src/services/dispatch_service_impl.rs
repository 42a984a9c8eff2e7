//! `SeaORM` implementation of the `DispatchService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::db::{self, SendSummary, Store, Template};
use crate::personalize::{personalize, personalize_html};
use crate::services::dispatch_service::{
    DeliveryDetails, DeliveryFailure, DeliverySuccess, DispatchError, DispatchReport,
    DispatchService,
};
use crate::services::mailer::{MailTransport, OutgoingMail};

const TEXT_WRAP_WIDTH: usize = 80;

pub struct SeaOrmDispatchService {
    store: Store,
    mailer: Arc<dyn MailTransport>,
    sender: String,
}

impl SeaOrmDispatchService {
    #[must_use]
    pub fn new(store: Store, mailer: Arc<dyn MailTransport>, sender: String) -> Self {
        Self {
            store,
            mailer,
            sender,
        }
    }

    async fn deliver_one(
        &self,
        template: &Template,
        user_id: i32,
    ) -> Result<DeliverySuccess, String> {
        let user = self
            .store
            .get_user(user_id)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "User not found".to_string())?;

        self.store
            .record_delivery(user.user_id, template.template_id)
            .await
            .map_err(|e| e.to_string())?;

        let html = personalize_html(&template.template_body, &user);
        let text = html2text::from_read(html.as_bytes(), TEXT_WRAP_WIDTH)
            .unwrap_or_else(|_| personalize(&template.template_body, &user));

        let mail = OutgoingMail {
            from: self.sender.clone(),
            to: user.user_email.clone(),
            subject: template.template_name.clone(),
            html,
            text,
        };

        self.mailer.send(&mail).await.map_err(|e| e.to_string())?;

        Ok(DeliverySuccess {
            user_id: user.user_id,
            email: user.user_email,
            name: user.user_name,
        })
    }
}

#[async_trait]
impl DispatchService for SeaOrmDispatchService {
    async fn send_template(
        &self,
        template_id: i32,
        user_ids: &[i32],
    ) -> Result<DispatchReport, DispatchError> {
        let template = self
            .store
            .get_template(template_id)
            .await?
            .ok_or(DispatchError::TemplateNotFound(template_id))?;

        let sent_at = db::timestamp();
        let mut details = DeliveryDetails::default();

        info!(
            template_id,
            template = %template.template_name,
            recipients = user_ids.len(),
            transport = self.mailer.name(),
            "Starting bulk send"
        );

        for &user_id in user_ids {
            match self.deliver_one(&template, user_id).await {
                Ok(success) => {
                    metrics::counter!("emails_sent_total", "outcome" => "success").increment(1);
                    info!(user_id, email = %success.email, "Email sent");
                    details.success.push(success);
                }
                Err(reason) => {
                    metrics::counter!("emails_sent_total", "outcome" => "failed").increment(1);
                    warn!(user_id, %reason, "Email not sent");
                    details.failed.push(DeliveryFailure { user_id, reason });
                }
            }
        }

        let success_count = i32::try_from(details.success.len())
            .map_err(|e| DispatchError::Internal(e.to_string()))?;
        let failed_count = i32::try_from(details.failed.len())
            .map_err(|e| DispatchError::Internal(e.to_string()))?;

        let record = self
            .store
            .record_send(SendSummary {
                template_id: template.template_id,
                template_name: template.template_name.clone(),
                recipients_count: success_count + failed_count,
                success_count,
                failed_count,
                sent_at,
                completed_at: db::timestamp(),
            })
            .await?;

        metrics::counter!("bulk_sends_total").increment(1);
        info!(
            email_id = record.email_id,
            success_count, failed_count, "Bulk send completed"
        );

        Ok(DispatchReport {
            id: record.email_id,
            message: "Email process completed".to_string(),
            sent_at: record.sent_at,
            template: record.template_name,
            success_count,
            failed_count,
            details,
        })
    }
}
