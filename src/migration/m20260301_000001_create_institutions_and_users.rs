//! Migration: institutions and their users.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Institutions::Table)
                    .if_not_exists()
                    .col(pk_auto(Institutions::Id))
                    .col(string(Institutions::Name))
                    .col(string(Institutions::Identifier).unique_key())
                    .col(string_len(Institutions::State, 1).default("A"))
                    .col(string(Institutions::Type))
                    .col(integer_null(Institutions::MemberInstitutionId))
                    .col(string(Institutions::ReceivingBucket))
                    .col(string(Institutions::RestoreBucket))
                    .col(big_integer(Institutions::SpotRestoreFrequency).default(0))
                    .col(integer_null(Institutions::LastSpotRestoreWorkItemId))
                    .col(timestamp_with_time_zone_null(Institutions::DeactivatedAt))
                    .col(timestamp_with_time_zone(Institutions::CreatedAt))
                    .col(timestamp_with_time_zone(Institutions::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Name))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::Role))
                    .col(integer(Users::InstitutionId))
                    .col(string_null(Users::ApiKeyHash))
                    .col(timestamp_with_time_zone_null(Users::DeactivatedAt))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_institution")
                            .from(Users::Table, Users::InstitutionId)
                            .to(Institutions::Table, Institutions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_institution_role")
                    .table(Users::Table)
                    .col(Users::InstitutionId)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Institutions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Institutions {
    Table,
    Id,
    Name,
    Identifier,
    State,
    Type,
    MemberInstitutionId,
    ReceivingBucket,
    RestoreBucket,
    SpotRestoreFrequency,
    LastSpotRestoreWorkItemId,
    DeactivatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    InstitutionId,
    ApiKeyHash,
    DeactivatedAt,
    CreatedAt,
    UpdatedAt,
}
