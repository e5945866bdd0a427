//! Institution entity for SeaORM.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "institutions")]
#[schema(as = Institution)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Domain name, e.g. `example.edu`
    #[sea_orm(unique)]
    pub identifier: String,
    /// `A` (active) or `D` (deleted)
    pub state: String,
    #[sea_orm(column_name = "type")]
    pub institution_type: String,
    /// Parent member institution, set only for subscribers
    pub member_institution_id: Option<i32>,
    pub receiving_bucket: String,
    pub restore_bucket: String,
    /// Days between restoration spot tests; 0 turns them off
    pub spot_restore_frequency: i64,
    /// Restore Object item of the most recent spot test
    pub last_spot_restore_work_item_id: Option<i32>,
    /// Set iff `state` is `D`
    pub deactivated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
    #[sea_orm(has_many = "super::intellectual_object::Entity")]
    IntellectualObjects,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::intellectual_object::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntellectualObjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
