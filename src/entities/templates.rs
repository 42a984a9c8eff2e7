use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub template_id: i32,

    pub template_name: String,

    #[sea_orm(column_type = "Text")]
    pub template_body: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_templates::Entity")]
    UserTemplates,
}

impl Related<super::user_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserTemplates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
