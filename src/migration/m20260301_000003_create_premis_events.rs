//! Migration: PREMIS events.

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000002_create_objects_and_files::IntellectualObjects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PremisEvents::Table)
                    .if_not_exists()
                    .col(pk_auto(PremisEvents::Id))
                    .col(string(PremisEvents::Identifier).unique_key())
                    .col(string(PremisEvents::EventType))
                    .col(timestamp_with_time_zone(PremisEvents::DateTime))
                    .col(text(PremisEvents::Detail))
                    .col(string(PremisEvents::Outcome))
                    .col(text(PremisEvents::OutcomeDetail))
                    .col(text(PremisEvents::OutcomeInformation))
                    .col(string(PremisEvents::Object))
                    .col(string(PremisEvents::Agent))
                    .col(integer(PremisEvents::IntellectualObjectId))
                    .col(integer_null(PremisEvents::GenericFileId))
                    .col(integer(PremisEvents::InstitutionId))
                    .col(timestamp_with_time_zone(PremisEvents::CreatedAt))
                    .col(timestamp_with_time_zone(PremisEvents::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_premis_events_intellectual_object")
                            .from(PremisEvents::Table, PremisEvents::IntellectualObjectId)
                            .to(IntellectualObjects::Table, IntellectualObjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Latest ingest/deletion lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_premis_events_object_type_created")
                    .table(PremisEvents::Table)
                    .col(PremisEvents::IntellectualObjectId)
                    .col(PremisEvents::EventType)
                    .col(PremisEvents::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_premis_events_generic_file")
                    .table(PremisEvents::Table)
                    .col(PremisEvents::GenericFileId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PremisEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PremisEvents {
    Table,
    Id,
    Identifier,
    EventType,
    DateTime,
    Detail,
    Outcome,
    OutcomeDetail,
    OutcomeInformation,
    Object,
    Agent,
    IntellectualObjectId,
    GenericFileId,
    InstitutionId,
    CreatedAt,
    UpdatedAt,
}
