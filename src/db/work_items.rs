//! Database queries for work items.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use crate::entity::work_item::{self, ActiveModel, Entity as WorkItem};
use crate::error::{AppError, AppResult};
use crate::models::{Stage, WorkItemAction, WorkItemStatus};

use super::DbPool;

/// Insert a work item row on any connection or transaction.
pub(super) async fn insert_work_item_row<C: ConnectionTrait>(
    db: &C,
    item: work_item::Model,
) -> AppResult<work_item::Model> {
    let mut active: ActiveModel = item.into_active_model().reset_all();
    active.id = NotSet;
    active
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert work item: {}", e)))
}

impl DbPool {
    /// Validate and store a work item.
    ///
    /// Items with id 0 are inserted. Existing items are updated after
    /// checking that the update does not change what the item is about.
    /// A spot test restoration that just succeeded alerts its institution.
    pub async fn save_work_item(&self, item: work_item::Model) -> AppResult<work_item::Model> {
        item.validate()?;

        if item.id == 0 {
            return insert_work_item_row(self.connection(), item).await;
        }

        let stored = self
            .get_work_item(item.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Work item {}", item.id)))?;
        stored.validate_changes(&item)?;

        let mut active: ActiveModel = item.into_active_model().reset_all();
        active.created_at = Set(stored.created_at);
        active.updated_at = Set(Utc::now());
        let item = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update work item: {}", e)))?;

        if stored.status != item.status {
            self.alert_on_successful_spot_test(&item).await;
        }
        Ok(item)
    }

    pub async fn get_work_item(&self, id: i32) -> AppResult<Option<work_item::Model>> {
        WorkItem::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get work item: {}", e)))
    }

    /// Record when an item was handed to the queue.
    pub async fn mark_work_item_queued(
        &self,
        item: work_item::Model,
        queued_at: DateTime<Utc>,
    ) -> AppResult<work_item::Model> {
        let mut active: ActiveModel = item.into();
        active.queued_at = Set(Some(queued_at));
        active.updated_at = Set(Utc::now());
        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to mark work item queued: {}", e)))
    }

    /// Unfinished work items for a bag, newest `date_processed` first.
    pub async fn work_items_pending_for_object(
        &self,
        institution_id: i32,
        bag_name: &str,
    ) -> AppResult<Vec<work_item::Model>> {
        WorkItem::find()
            .filter(work_item::Column::InstitutionId.eq(institution_id))
            .filter(work_item::Column::Name.eq(bag_name))
            .filter(work_item::Column::Status.is_not_in(WorkItemStatus::completed_strs()))
            .order_by_desc(work_item::Column::DateProcessed)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get pending work items: {}", e)))
    }

    /// Unfinished work items for a single file, newest `date_processed` first.
    pub async fn work_items_pending_for_file(&self, file_id: i32) -> AppResult<Vec<work_item::Model>> {
        WorkItem::find()
            .filter(work_item::Column::GenericFileId.eq(file_id))
            .filter(work_item::Column::Status.is_not_in(WorkItemStatus::completed_strs()))
            .order_by_desc(work_item::Column::DateProcessed)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get pending work items for file: {}", e))
            })
    }

    /// Latest ingest of the object that got through to Record or Cleanup.
    pub async fn last_successful_ingest(&self, object_id: i32) -> AppResult<Option<work_item::Model>> {
        WorkItem::find()
            .filter(work_item::Column::IntellectualObjectId.eq(object_id))
            .filter(work_item::Column::GenericFileId.is_null())
            .filter(work_item::Column::Action.eq(WorkItemAction::Ingest.as_str()))
            .filter(work_item::Column::Status.eq(WorkItemStatus::Success.as_str()))
            .filter(
                work_item::Column::Stage
                    .is_in([Stage::Record.as_str(), Stage::Cleanup.as_str()]),
            )
            .order_by_desc(work_item::Column::DateProcessed)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get last ingest: {}", e)))
    }

    /// Unfinished Delete work item for the whole object, if any.
    pub async fn active_deletion_item_for_object(
        &self,
        object_id: i32,
    ) -> AppResult<Option<work_item::Model>> {
        WorkItem::find()
            .filter(work_item::Column::IntellectualObjectId.eq(object_id))
            .filter(work_item::Column::GenericFileId.is_null())
            .filter(work_item::Column::Action.eq(WorkItemAction::Delete.as_str()))
            .filter(work_item::Column::Status.is_not_in(WorkItemStatus::completed_strs()))
            .order_by_desc(work_item::Column::CreatedAt)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get deletion work item: {}", e)))
    }

    /// Unfinished Delete work item for one file, if any.
    pub async fn active_deletion_item_for_file(
        &self,
        file_id: i32,
    ) -> AppResult<Option<work_item::Model>> {
        WorkItem::find()
            .filter(work_item::Column::GenericFileId.eq(file_id))
            .filter(work_item::Column::Action.eq(WorkItemAction::Delete.as_str()))
            .filter(work_item::Column::Status.is_not_in(WorkItemStatus::completed_strs()))
            .order_by_desc(work_item::Column::CreatedAt)
            .one(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get file deletion work item: {}", e))
            })
    }
}
