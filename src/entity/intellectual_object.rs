//! Intellectual object (bag) entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "intellectual_objects")]
#[schema(as = IntellectualObject)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    /// `<institution identifier>/<bag name>`
    #[sea_orm(unique)]
    pub identifier: String,
    pub alt_identifier: Option<String>,
    pub access: String,
    pub bag_name: String,
    pub institution_id: i32,
    pub state: String,
    pub etag: Option<String>,
    pub bag_group_identifier: Option<String>,
    pub storage_option: String,
    pub bagit_profile_identifier: String,
    pub source_organization: Option<String>,
    pub internal_sender_identifier: Option<String>,
    pub internal_sender_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::institution::Entity",
        from = "Column::InstitutionId",
        to = "super::institution::Column::Id"
    )]
    Institution,
    #[sea_orm(has_many = "super::generic_file::Entity")]
    GenericFiles,
    #[sea_orm(has_many = "super::premis_event::Entity")]
    PremisEvents,
}

impl Related<super::institution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institution.def()
    }
}

impl Related<super::generic_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GenericFiles.def()
    }
}

impl Related<super::premis_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PremisEvents.def()
    }
}

impl Related<super::deletion_request::Entity> for Entity {
    fn to() -> RelationDef {
        super::deletion_request_intellectual_object::Relation::DeletionRequest.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::deletion_request_intellectual_object::Relation::IntellectualObject.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
