//! Database queries for institutions.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

use crate::entity::institution::{self, ActiveModel, Entity as Institution};
use crate::error::{AppError, AppResult};
use crate::models::Lifecycle;

use super::DbPool;

impl DbPool {
    pub async fn insert_institution(&self, model: institution::Model) -> AppResult<institution::Model> {
        let mut active: ActiveModel = model.into_active_model().reset_all();
        active.id = NotSet;
        active
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert institution: {}", e)))
    }

    pub async fn get_institution(&self, id: i32) -> AppResult<Option<institution::Model>> {
        Institution::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get institution: {}", e)))
    }

    /// Store a lifecycle transition: state and deactivation time change together.
    pub async fn set_institution_lifecycle(
        &self,
        model: institution::Model,
        lifecycle: Lifecycle,
    ) -> AppResult<institution::Model> {
        let mut active: ActiveModel = model.into();
        active.state = Set(lifecycle.state().as_str().to_string());
        active.deactivated_at = Set(lifecycle.deactivated_at());
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update institution state: {}", e)))
    }

    /// Institution whose most recent spot test is `work_item_id`, if any.
    pub async fn spot_test_institution(
        &self,
        work_item_id: i32,
    ) -> AppResult<Option<institution::Model>> {
        Institution::find()
            .filter(institution::Column::LastSpotRestoreWorkItemId.eq(work_item_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get spot test institution: {}", e)))
    }

    /// Remember `work_item_id` as the institution's latest spot test.
    pub async fn set_last_spot_restore_item(
        &self,
        model: institution::Model,
        work_item_id: i32,
    ) -> AppResult<institution::Model> {
        let mut active: ActiveModel = model.into();
        active.last_spot_restore_work_item_id = Set(Some(work_item_id));
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to record spot test: {}", e)))
    }
}
