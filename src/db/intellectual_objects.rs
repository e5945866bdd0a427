//! Database queries for intellectual objects.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, TransactionTrait,
};

use crate::entity::generic_file;
use crate::entity::intellectual_object::{self, ActiveModel, Entity as IntellectualObject};
use crate::entity::premis_event;
use crate::error::{AppError, AppResult};
use crate::models::RecordState;

use super::DbPool;
use super::premis_events::insert_event_row;

impl DbPool {
    pub async fn insert_intellectual_object(
        &self,
        model: intellectual_object::Model,
    ) -> AppResult<intellectual_object::Model> {
        let mut active: ActiveModel = model.into_active_model().reset_all();
        active.id = NotSet;
        active
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert intellectual object: {}", e)))
    }

    pub async fn get_intellectual_object(
        &self,
        id: i32,
    ) -> AppResult<Option<intellectual_object::Model>> {
        IntellectualObject::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get intellectual object: {}", e)))
    }

    /// Number of files of the object still in state `A`.
    pub async fn count_active_files(&self, object_id: i32) -> AppResult<u64> {
        generic_file::Entity::find()
            .filter(generic_file::Column::IntellectualObjectId.eq(object_id))
            .filter(generic_file::Column::State.eq(RecordState::Active.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count active files: {}", e)))
    }

    /// Write the deleted object and its deletion event in one transaction.
    ///
    /// Either both rows are written or neither is.
    pub async fn save_object_deletion(
        &self,
        object: intellectual_object::Model,
        event: premis_event::Model,
    ) -> AppResult<(intellectual_object::Model, premis_event::Model)> {
        let txn = self.connection().begin().await?;

        let active: ActiveModel = object.into_active_model().reset_all();
        let object = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update intellectual object: {}", e)))?;
        let event = match insert_event_row(&txn, event).await {
            Ok(event) => event,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        txn.commit().await?;
        Ok((object, event))
    }
}
