//! Database queries for PREMIS events.
//!
//! Events are insert-only: there is no update path.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entity::premis_event::{self, ActiveModel, Entity as PremisEvent};
use crate::error::{AppError, AppResult};
use crate::models::EventType;

use super::DbPool;

/// Insert an event row on any connection or transaction.
pub(super) async fn insert_event_row<C: ConnectionTrait>(
    db: &C,
    event: premis_event::Model,
) -> AppResult<premis_event::Model> {
    let mut active: ActiveModel = event.into_active_model().reset_all();
    active.id = NotSet;
    active
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert premis event: {}", e)))
}

impl DbPool {
    /// Insert a new event. Saving an event that already has an id fails
    /// with [`AppError::NotSupported`] and leaves the stored row untouched.
    pub async fn save_premis_event(&self, event: premis_event::Model) -> AppResult<premis_event::Model> {
        if event.id != 0 {
            return Err(AppError::NotSupported(
                "premis events cannot be updated".to_string(),
            ));
        }
        event.validate()?;
        insert_event_row(self.connection(), event).await
    }

    pub async fn get_premis_event(&self, id: i32) -> AppResult<Option<premis_event::Model>> {
        PremisEvent::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get premis event: {}", e)))
    }

    /// Most recent object-level event of `event_type` (file events excluded).
    pub async fn latest_object_event(
        &self,
        object_id: i32,
        event_type: EventType,
    ) -> AppResult<Option<premis_event::Model>> {
        PremisEvent::find()
            .filter(premis_event::Column::IntellectualObjectId.eq(object_id))
            .filter(premis_event::Column::GenericFileId.is_null())
            .filter(premis_event::Column::EventType.eq(event_type.as_str()))
            .order_by_desc(premis_event::Column::CreatedAt)
            .order_by_desc(premis_event::Column::Id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest object event: {}", e)))
    }

    /// Most recent event of `event_type` for one file.
    pub async fn latest_file_event(
        &self,
        file_id: i32,
        event_type: EventType,
    ) -> AppResult<Option<premis_event::Model>> {
        PremisEvent::find()
            .filter(premis_event::Column::GenericFileId.eq(file_id))
            .filter(premis_event::Column::EventType.eq(event_type.as_str()))
            .order_by_desc(premis_event::Column::CreatedAt)
            .order_by_desc(premis_event::Column::Id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest file event: {}", e)))
    }

    pub async fn count_events_for_object(
        &self,
        object_id: i32,
        event_type: EventType,
    ) -> AppResult<u64> {
        PremisEvent::find()
            .filter(premis_event::Column::IntellectualObjectId.eq(object_id))
            .filter(premis_event::Column::EventType.eq(event_type.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count events: {}", e)))
    }
}
