//! Alert entity: a stored notice for one or more users.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub institution_id: i32,
    #[sea_orm(column_name = "type")]
    pub alert_type: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub deletion_request_id: Option<i32>,
    pub work_item_id: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::alert_user::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::alert_user::Relation::Alert.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
