//! Generic file entity. Each file belongs to one intellectual object.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "generic_files")]
#[schema(as = GenericFile)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub file_format: String,
    pub size: i64,
    #[sea_orm(unique)]
    pub identifier: String,
    pub intellectual_object_id: i32,
    pub institution_id: i32,
    pub state: String,
    pub storage_option: String,
    /// Key of the file in preservation storage
    pub uuid: String,
    pub last_fixity_check: Option<DateTime<Utc>>,
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
    #[sea_orm(has_many = "super::checksum::Entity")]
    Checksums,
}

impl Related<super::intellectual_object::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntellectualObject.def()
    }
}

impl Related<super::checksum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checksums.def()
    }
}

impl Related<super::deletion_request::Entity> for Entity {
    fn to() -> RelationDef {
        super::deletion_request_generic_file::Relation::DeletionRequest.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::deletion_request_generic_file::Relation::GenericFile.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
