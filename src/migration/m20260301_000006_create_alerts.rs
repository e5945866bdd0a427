//! Migration: alerts and their recipients.

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_institutions_and_users::{Institutions, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(pk_auto(Alerts::Id))
                    .col(integer(Alerts::InstitutionId))
                    .col(string(Alerts::Type))
                    .col(string(Alerts::Subject))
                    .col(text(Alerts::Content))
                    .col(integer_null(Alerts::DeletionRequestId))
                    .col(integer_null(Alerts::WorkItemId))
                    .col(timestamp_with_time_zone(Alerts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alerts_institution")
                            .from(Alerts::Table, Alerts::InstitutionId)
                            .to(Institutions::Table, Institutions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlertsUsers::Table)
                    .if_not_exists()
                    .col(integer(AlertsUsers::AlertId))
                    .col(integer(AlertsUsers::UserId))
                    .col(timestamp_with_time_zone_null(AlertsUsers::ReadAt))
                    .primary_key(
                        Index::create()
                            .col(AlertsUsers::AlertId)
                            .col(AlertsUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alerts_users_alert")
                            .from(AlertsUsers::Table, AlertsUsers::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alerts_users_user")
                            .from(AlertsUsers::Table, AlertsUsers::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertsUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
    InstitutionId,
    Type,
    Subject,
    Content,
    DeletionRequestId,
    WorkItemId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AlertsUsers {
    Table,
    AlertId,
    UserId,
    ReadAt,
}
