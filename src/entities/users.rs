use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_id: i32,

    pub user_name: String,

    #[sea_orm(unique)]
    pub user_email: String,

    pub city: Option<String>,

    pub state: Option<String>,

    pub gender: Option<Gender>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
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
