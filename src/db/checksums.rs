//! Database queries for checksums.

use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, IntoActiveModel};

use crate::entity::checksum::{self, ActiveModel, Entity as Checksum};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Insert a checksum. Checksums are never updated.
    pub async fn save_checksum(&self, model: checksum::Model) -> AppResult<checksum::Model> {
        if model.id != 0 {
            return Err(AppError::NotSupported(
                "checksums cannot be updated".to_string(),
            ));
        }
        model.validate()?;

        let mut active: ActiveModel = model.into_active_model().reset_all();
        active.id = NotSet;
        active
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert checksum: {}", e)))
    }

    pub async fn get_checksum(&self, id: i32) -> AppResult<Option<checksum::Model>> {
        Checksum::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get checksum: {}", e)))
    }
}
