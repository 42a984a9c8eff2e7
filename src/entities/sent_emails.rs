use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One row per bulk send. `template_id` is deliberately not a foreign key so
/// history survives template deletion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sent_emails")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub email_id: i32,
    pub template_id: i32,
    pub template_name: String,
    pub recipients_count: i32,
    pub success_count: i32,
    pub failed_count: i32,
    pub sent_at: String,
    pub completed_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
