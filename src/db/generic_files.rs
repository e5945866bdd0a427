//! Database queries for generic files.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, EntityTrait, IntoActiveModel, TransactionTrait,
};

use crate::entity::generic_file::{self, ActiveModel, Entity as GenericFile};
use crate::entity::premis_event;
use crate::error::{AppError, AppResult};

use super::DbPool;
use super::premis_events::insert_event_row;

impl DbPool {
    pub async fn insert_generic_file(&self, model: generic_file::Model) -> AppResult<generic_file::Model> {
        let mut active: ActiveModel = model.into_active_model().reset_all();
        active.id = NotSet;
        active
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert generic file: {}", e)))
    }

    pub async fn get_generic_file(&self, id: i32) -> AppResult<Option<generic_file::Model>> {
        GenericFile::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get generic file: {}", e)))
    }

    /// Write the deleted file and its deletion event in one transaction.
    pub async fn save_file_deletion(
        &self,
        file: generic_file::Model,
        event: premis_event::Model,
    ) -> AppResult<(generic_file::Model, premis_event::Model)> {
        let txn = self.connection().begin().await?;

        let active: ActiveModel = file.into_active_model().reset_all();
        let file = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update generic file: {}", e)))?;
        let event = match insert_event_row(&txn, event).await {
            Ok(event) => event,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        txn.commit().await?;
        Ok((file, event))
    }
}
