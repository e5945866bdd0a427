//! PREMIS event entity. Rows are written once and never updated.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "premis_events")]
#[schema(as = PremisEvent)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// UUID string
    #[sea_orm(unique)]
    pub identifier: String,
    pub event_type: String,
    pub date_time: DateTime<Utc>,
    pub detail: String,
    pub outcome: String,
    pub outcome_detail: String,
    pub outcome_information: String,
    pub object: String,
    pub agent: String,
    pub intellectual_object_id: i32,
    /// Set for file-level events; `None` for object-level events
    pub generic_file_id: Option<i32>,
    pub institution_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::intellectual_object::Entity",
        from = "Column::IntellectualObjectId",
        to = "super::intellectual_object::Column::Id"
    )]
    IntellectualObject,
}

impl Related<super::intellectual_object::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntellectualObject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
