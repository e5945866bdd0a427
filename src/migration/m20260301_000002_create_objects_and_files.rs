//! Migration: intellectual objects, generic files and checksums.

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
                    .table(IntellectualObjects::Table)
                    .if_not_exists()
                    .col(pk_auto(IntellectualObjects::Id))
                    .col(string(IntellectualObjects::Title))
                    .col(text_null(IntellectualObjects::Description))
                    .col(string(IntellectualObjects::Identifier).unique_key())
                    .col(string_null(IntellectualObjects::AltIdentifier))
                    .col(string(IntellectualObjects::Access))
                    .col(string(IntellectualObjects::BagName))
                    .col(integer(IntellectualObjects::InstitutionId))
                    .col(string_len(IntellectualObjects::State, 1).default("A"))
                    .col(string_null(IntellectualObjects::Etag))
                    .col(string_null(IntellectualObjects::BagGroupIdentifier))
                    .col(string(IntellectualObjects::StorageOption))
                    .col(string(IntellectualObjects::BagitProfileIdentifier))
                    .col(string_null(IntellectualObjects::SourceOrganization))
                    .col(string_null(IntellectualObjects::InternalSenderIdentifier))
                    .col(text_null(IntellectualObjects::InternalSenderDescription))
                    .col(timestamp_with_time_zone(IntellectualObjects::CreatedAt))
                    .col(timestamp_with_time_zone(IntellectualObjects::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_intellectual_objects_institution")
                            .from(IntellectualObjects::Table, IntellectualObjects::InstitutionId)
                            .to(Institutions::Table, Institutions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_intellectual_objects_institution_bag_name")
                    .table(IntellectualObjects::Table)
                    .col(IntellectualObjects::InstitutionId)
                    .col(IntellectualObjects::BagName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GenericFiles::Table)
                    .if_not_exists()
                    .col(pk_auto(GenericFiles::Id))
                    .col(string(GenericFiles::FileFormat))
                    .col(big_integer(GenericFiles::Size))
                    .col(string(GenericFiles::Identifier).unique_key())
                    .col(integer(GenericFiles::IntellectualObjectId))
                    .col(integer(GenericFiles::InstitutionId))
                    .col(string_len(GenericFiles::State, 1).default("A"))
                    .col(string(GenericFiles::StorageOption))
                    .col(string(GenericFiles::Uuid))
                    .col(timestamp_with_time_zone_null(GenericFiles::LastFixityCheck))
                    .col(timestamp_with_time_zone(GenericFiles::CreatedAt))
                    .col(timestamp_with_time_zone(GenericFiles::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generic_files_intellectual_object")
                            .from(GenericFiles::Table, GenericFiles::IntellectualObjectId)
                            .to(IntellectualObjects::Table, IntellectualObjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Active-file lookups filter on object and state
        manager
            .create_index(
                Index::create()
                    .name("idx_generic_files_object_state")
                    .table(GenericFiles::Table)
                    .col(GenericFiles::IntellectualObjectId)
                    .col(GenericFiles::State)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Checksums::Table)
                    .if_not_exists()
                    .col(pk_auto(Checksums::Id))
                    .col(string(Checksums::Algorithm))
                    .col(timestamp_with_time_zone(Checksums::DateTime))
                    .col(string(Checksums::Digest))
                    .col(integer(Checksums::GenericFileId))
                    .col(timestamp_with_time_zone(Checksums::CreatedAt))
                    .col(timestamp_with_time_zone(Checksums::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checksums_generic_file")
                            .from(Checksums::Table, Checksums::GenericFileId)
                            .to(GenericFiles::Table, GenericFiles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Checksums::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GenericFiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IntellectualObjects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum IntellectualObjects {
    Table,
    Id,
    Title,
    Description,
    Identifier,
    AltIdentifier,
    Access,
    BagName,
    InstitutionId,
    State,
    Etag,
    BagGroupIdentifier,
    StorageOption,
    BagitProfileIdentifier,
    SourceOrganization,
    InternalSenderIdentifier,
    InternalSenderDescription,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum GenericFiles {
    Table,
    Id,
    FileFormat,
    Size,
    Identifier,
    IntellectualObjectId,
    InstitutionId,
    State,
    StorageOption,
    Uuid,
    LastFixityCheck,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Checksums {
    Table,
    Id,
    Algorithm,
    DateTime,
    Digest,
    GenericFileId,
    CreatedAt,
    UpdatedAt,
}
