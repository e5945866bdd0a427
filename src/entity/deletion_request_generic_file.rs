//! Join table between deletion requests and generic files.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "deletion_requests_generic_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub deletion_request_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub generic_file_id: i32,
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
        belongs_to = "super::generic_file::Entity",
        from = "Column::GenericFileId",
        to = "super::generic_file::Column::Id"
    )]
    GenericFile,
}

impl ActiveModelBehavior for ActiveModel {}
