//! Checksum entity. Insert-only.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "checksums")]
#[schema(as = Checksum)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub algorithm: String,
    pub date_time: DateTime<Utc>,
    pub digest: String,
    pub generic_file_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::generic_file::Entity",
        from = "Column::GenericFileId",
        to = "super::generic_file::Column::Id"
    )]
    GenericFile,
}

impl Related<super::generic_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GenericFile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
