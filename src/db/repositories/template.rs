use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::{prelude::*, templates};

pub struct TemplateRepository {
    conn: DatabaseConnection,
}

impl TemplateRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<templates::Model>> {
        Templates::find()
            .order_by_asc(templates::Column::TemplateId)
            .all(&self.conn)
            .await
            .context("Failed to list templates")
    }

    pub async fn get(&self, id: i32) -> Result<Option<templates::Model>> {
        Templates::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query template by ID")
    }

    pub async fn create(&self, name: &str, body: &str) -> Result<templates::Model> {
        let model = templates::ActiveModel {
            template_name: Set(name.to_string()),
            template_body: Set(body.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create template")?;

        info!("Created template {}: {}", model.template_id, model.template_name);
        Ok(model)
    }

    /// Returns `None` when the template does not exist.
    pub async fn update(
        &self,
        id: i32,
        name: &str,
        body: &str,
    ) -> Result<Option<templates::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: templates::ActiveModel = existing.into();
        active.template_name = Set(name.to_string());
        active.template_body = Set(body.to_string());

        let model = active
            .update(&self.conn)
            .await
            .with_context(|| format!("Failed to update template {id}"))?;

        Ok(Some(model))
    }

    /// Junction rows go with the template (FK cascade); send history stays.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Templates::delete_by_id(id)
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete template {id}"))?;

        if result.rows_affected > 0 {
            info!("Deleted template {}", id);
        }

        Ok(result.rows_affected > 0)
    }
}
