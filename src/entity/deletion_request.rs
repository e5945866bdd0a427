//! Deletion request entity.
//!
//! A request targets objects and/or files through the two join tables and
//! is linked to the deletion work item created when it is approved.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "deletion_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub institution_id: i32,
    pub requested_by_id: i32,
    pub requested_at: DateTimeUtc,
    /// Argon2 PHC string of the confirmation token
    #[serde(skip_serializing)]
    pub encrypted_confirmation_token: String,
    pub confirmed_by_id: Option<i32>,
    pub confirmed_at: Option<DateTimeUtc>,
    pub cancelled_by_id: Option<i32>,
    pub cancelled_at: Option<DateTimeUtc>,
    #[sea_orm(unique)]
    pub work_item_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::institution::Entity",
        from = "Column::InstitutionId",
        to = "super::institution::Column::Id"
    )]
    Institution,
}

impl Related<super::institution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institution.def()
    }
}

impl Related<super::generic_file::Entity> for Entity {
    fn to() -> RelationDef {
        super::deletion_request_generic_file::Relation::GenericFile.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::deletion_request_generic_file::Relation::DeletionRequest.def().rev())
    }
}

impl Related<super::intellectual_object::Entity> for Entity {
    fn to() -> RelationDef {
        super::deletion_request_intellectual_object::Relation::IntellectualObject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::deletion_request_intellectual_object::Relation::DeletionRequest.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
