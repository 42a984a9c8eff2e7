use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::entities::{prelude::*, sent_emails};

/// Final outcome of a bulk send, written once the recipient loop is done.
#[derive(Debug, Clone)]
pub struct SendSummary {
    pub template_id: i32,
    pub template_name: String,
    pub recipients_count: i32,
    pub success_count: i32,
    pub failed_count: i32,
    pub sent_at: String,
    pub completed_at: String,
}

pub struct SendHistoryRepository {
    conn: DatabaseConnection,
}

impl SendHistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a finished summary. Rows are never written with placeholder
    /// counts and never updated afterwards.
    pub async fn record(&self, summary: SendSummary) -> Result<sent_emails::Model> {
        anyhow::ensure!(
            summary.success_count + summary.failed_count == summary.recipients_count,
            "send summary counts do not add up ({} + {} != {})",
            summary.success_count,
            summary.failed_count,
            summary.recipients_count
        );

        let txn = self.conn.begin().await?;

        let model = sent_emails::ActiveModel {
            template_id: Set(summary.template_id),
            template_name: Set(summary.template_name),
            recipients_count: Set(summary.recipients_count),
            success_count: Set(summary.success_count),
            failed_count: Set(summary.failed_count),
            sent_at: Set(summary.sent_at),
            completed_at: Set(summary.completed_at),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert send summary")?;

        txn.commit().await?;
        Ok(model)
    }

    /// Newest first; ties on `sent_at` fall back to insertion order.
    pub async fn recent(&self, limit: u64) -> Result<Vec<sent_emails::Model>> {
        SentEmails::find()
            .order_by_desc(sent_emails::Column::SentAt)
            .order_by_desc(sent_emails::Column::EmailId)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query send history")
    }
}
