//! Join table between deletion requests and intellectual objects.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "deletion_requests_intellectual_objects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub deletion_request_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub intellectual_object_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deletion_request::Entity",
        from = "Column::DeletionRequestId",
        to = "super::deletion_request::Column::Id",
        on_delete = "Cascade"
    )]
    DeletionRequest,
    #[sea_orm(
        belongs_to = "super::intellectual_object::Entity",
        from = "Column::IntellectualObjectId",
        to = "super::intellectual_object::Column::Id"
    )]
    IntellectualObject,
}

impl ActiveModelBehavior for ActiveModel {}
