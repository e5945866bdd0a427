//! Registry user entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "users")]
#[schema(as = User)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// `admin`, `institutional_admin` or `institutional_user`
    pub role: String,
    pub institution_id: i32,
    /// SHA-256 of the user's API key (hex), never the key itself
    #[serde(skip_serializing)]
    pub api_key_hash: Option<String>,
    pub deactivated_at: Option<DateTime<Utc>>,
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

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        super::alert_user::Relation::Alert.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::alert_user::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
