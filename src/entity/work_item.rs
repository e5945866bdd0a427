//! Work item entity: one unit of ingest, restore or deletion work.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "work_items")]
#[schema(as = WorkItem)]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Bag name
    pub name: String,
    pub etag: String,
    pub institution_id: i32,
    pub intellectual_object_id: Option<i32>,
    /// Set when the item concerns a single file
    pub generic_file_id: Option<i32>,
    pub bucket: String,
    /// Email of the user who requested the work
    pub user: String,
    pub note: String,
    pub action: String,
    pub stage: String,
    pub status: String,
    pub outcome: String,
    pub bag_date: DateTime<Utc>,
    pub date_processed: DateTime<Utc>,
    pub retry: bool,
    /// Host currently processing the item
    pub node: Option<String>,
    pub pid: i32,
    pub needs_admin_review: bool,
    pub queued_at: Option<DateTime<Utc>>,
    pub size: i64,
    pub stage_started_at: Option<DateTime<Utc>>,
    pub aptrust_approver: Option<String>,
    /// Email of the institutional admin who approved a deletion
    pub inst_approver: Option<String>,
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
}

impl Related<super::institution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institution.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
