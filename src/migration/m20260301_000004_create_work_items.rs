//! Migration: work items.

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_institutions_and_users::Institutions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkItems::Table)
                    .if_not_exists()
                    .col(pk_auto(WorkItems::Id))
                    .col(string(WorkItems::Name))
                    .col(string_len(WorkItems::Etag, 40))
                    .col(integer(WorkItems::InstitutionId))
                    .col(integer_null(WorkItems::IntellectualObjectId))
                    .col(integer_null(WorkItems::GenericFileId))
                    .col(string(WorkItems::Bucket))
                    .col(string(WorkItems::User))
                    .col(text(WorkItems::Note))
                    .col(string(WorkItems::Action))
                    .col(string(WorkItems::Stage))
                    .col(string(WorkItems::Status))
                    .col(text(WorkItems::Outcome))
                    .col(timestamp_with_time_zone(WorkItems::BagDate))
                    .col(timestamp_with_time_zone(WorkItems::DateProcessed))
                    .col(boolean(WorkItems::Retry).default(true))
                    .col(string_null(WorkItems::Node))
                    .col(integer(WorkItems::Pid).default(0))
                    .col(boolean(WorkItems::NeedsAdminReview).default(false))
                    .col(timestamp_with_time_zone_null(WorkItems::QueuedAt))
                    .col(big_integer(WorkItems::Size).default(0))
                    .col(timestamp_with_time_zone_null(WorkItems::StageStartedAt))
                    .col(string_null(WorkItems::AptrustApprover))
                    .col(string_null(WorkItems::InstApprover))
                    .col(timestamp_with_time_zone(WorkItems::CreatedAt))
                    .col(timestamp_with_time_zone(WorkItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_items_institution")
                            .from(WorkItems::Table, WorkItems::InstitutionId)
                            .to(Institutions::Table, Institutions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Pending-work lookups by bag and by file
        manager
            .create_index(
                Index::create()
                    .name("idx_work_items_institution_name_status")
                    .table(WorkItems::Table)
                    .col(WorkItems::InstitutionId)
                    .col(WorkItems::Name)
                    .col(WorkItems::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_items_generic_file")
                    .table(WorkItems::Table)
                    .col(WorkItems::GenericFileId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_items_object_action")
                    .table(WorkItems::Table)
                    .col(WorkItems::IntellectualObjectId)
                    .col(WorkItems::Action)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum WorkItems {
    Table,
    Id,
    Name,
    Etag,
    InstitutionId,
    IntellectualObjectId,
    GenericFileId,
    Bucket,
    User,
    Note,
    Action,
    Stage,
    Status,
    Outcome,
    BagDate,
    DateProcessed,
    Retry,
    Node,
    Pid,
    NeedsAdminReview,
    QueuedAt,
    Size,
    StageStartedAt,
    AptrustApprover,
    InstApprover,
    CreatedAt,
    UpdatedAt,
}
