//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_institutions_and_users;
mod m20260301_000002_create_objects_and_files;
mod m20260301_000003_create_premis_events;
mod m20260301_000004_create_work_items;
mod m20260301_000005_create_deletion_requests;
mod m20260301_000006_create_alerts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_institutions_and_users::Migration),
            Box::new(m20260301_000002_create_objects_and_files::Migration),
            Box::new(m20260301_000003_create_premis_events::Migration),
            Box::new(m20260301_000004_create_work_items::Migration),
            Box::new(m20260301_000005_create_deletion_requests::Migration),
            Box::new(m20260301_000006_create_alerts::Migration),
        ]
    }
}
