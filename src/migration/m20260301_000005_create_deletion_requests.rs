//! Migration: deletion requests and the items they target.

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_institutions_and_users::{Institutions, Users};
use super::m20260301_000002_create_objects_and_files::{GenericFiles, IntellectualObjects};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeletionRequests::Table)
                    .if_not_exists()
                    .col(pk_auto(DeletionRequests::Id))
                    .col(integer(DeletionRequests::InstitutionId))
                    .col(integer(DeletionRequests::RequestedById))
                    .col(timestamp_with_time_zone(DeletionRequests::RequestedAt))
                    .col(string(DeletionRequests::EncryptedConfirmationToken))
                    .col(integer_null(DeletionRequests::ConfirmedById))
                    .col(timestamp_with_time_zone_null(DeletionRequests::ConfirmedAt))
                    .col(integer_null(DeletionRequests::CancelledById))
                    .col(timestamp_with_time_zone_null(DeletionRequests::CancelledAt))
                    .col(integer_null(DeletionRequests::WorkItemId).unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deletion_requests_institution")
                            .from(DeletionRequests::Table, DeletionRequests::InstitutionId)
                            .to(Institutions::Table, Institutions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deletion_requests_requested_by")
                            .from(DeletionRequests::Table, DeletionRequests::RequestedById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeletionRequestsGenericFiles::Table)
                    .if_not_exists()
                    .col(integer(DeletionRequestsGenericFiles::DeletionRequestId))
                    .col(integer(DeletionRequestsGenericFiles::GenericFileId))
                    .primary_key(
                        Index::create()
                            .col(DeletionRequestsGenericFiles::DeletionRequestId)
                            .col(DeletionRequestsGenericFiles::GenericFileId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drgf_deletion_request")
                            .from(
                                DeletionRequestsGenericFiles::Table,
                                DeletionRequestsGenericFiles::DeletionRequestId,
                            )
                            .to(DeletionRequests::Table, DeletionRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drgf_generic_file")
                            .from(
                                DeletionRequestsGenericFiles::Table,
                                DeletionRequestsGenericFiles::GenericFileId,
                            )
                            .to(GenericFiles::Table, GenericFiles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeletionRequestsIntellectualObjects::Table)
                    .if_not_exists()
                    .col(integer(DeletionRequestsIntellectualObjects::DeletionRequestId))
                    .col(integer(
                        DeletionRequestsIntellectualObjects::IntellectualObjectId,
                    ))
                    .primary_key(
                        Index::create()
                            .col(DeletionRequestsIntellectualObjects::DeletionRequestId)
                            .col(DeletionRequestsIntellectualObjects::IntellectualObjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drio_deletion_request")
                            .from(
                                DeletionRequestsIntellectualObjects::Table,
                                DeletionRequestsIntellectualObjects::DeletionRequestId,
                            )
                            .to(DeletionRequests::Table, DeletionRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drio_intellectual_object")
                            .from(
                                DeletionRequestsIntellectualObjects::Table,
                                DeletionRequestsIntellectualObjects::IntellectualObjectId,
                            )
                            .to(IntellectualObjects::Table, IntellectualObjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(DeletionRequestsIntellectualObjects::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(DeletionRequestsGenericFiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeletionRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum DeletionRequests {
    Table,
    Id,
    InstitutionId,
    RequestedById,
    RequestedAt,
    EncryptedConfirmationToken,
    ConfirmedById,
    ConfirmedAt,
    CancelledById,
    CancelledAt,
    WorkItemId,
}

#[derive(DeriveIden)]
enum DeletionRequestsGenericFiles {
    Table,
    DeletionRequestId,
    GenericFileId,
}

#[derive(DeriveIden)]
enum DeletionRequestsIntellectualObjects {
    Table,
    DeletionRequestId,
    IntellectualObjectId,
}
