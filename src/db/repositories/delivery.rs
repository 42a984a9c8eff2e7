use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};

use crate::entities::{prelude::*, user_templates};

/// Repository for the user/template junction
pub struct DeliveryRepository {
    conn: DatabaseConnection,
}

impl DeliveryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Upsert on the (user, template) pair. A repeat send only bumps
    /// `last_sent_at`.
    pub async fn record(&self, user_id: i32, template_id: i32, at: &str) -> Result<()> {
        let active_model = user_templates::ActiveModel {
            user_id: Set(user_id),
            template_id: Set(template_id),
            first_sent_at: Set(at.to_string()),
            last_sent_at: Set(at.to_string()),
            ..Default::default()
        };

        UserTemplates::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    user_templates::Column::UserId,
                    user_templates::Column::TemplateId,
                ])
                .update_column(user_templates::Column::LastSentAt)
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .with_context(|| {
                format!("Failed to record delivery of template {template_id} to user {user_id}")
            })?;

        Ok(())
    }

    pub async fn get(
        &self,
        user_id: i32,
        template_id: i32,
    ) -> Result<Option<user_templates::Model>> {
        UserTemplates::find()
            .filter(user_templates::Column::UserId.eq(user_id))
            .filter(user_templates::Column::TemplateId.eq(template_id))
            .one(&self.conn)
            .await
            .context("Failed to query delivery record")
    }

    pub async fn count_for_template(&self, template_id: i32) -> Result<u64> {
        UserTemplates::find()
            .filter(user_templates::Column::TemplateId.eq(template_id))
            .count(&self.conn)
            .await
            .context("Failed to count delivery records")
    }
}
