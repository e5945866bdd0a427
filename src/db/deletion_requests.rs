//! Database queries for deletion requests and their target join tables.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::OnConflict,
};

use crate::entity::deletion_request::{self, ActiveModel, Entity as DeletionRequest};
use crate::entity::{
    deletion_request_generic_file as request_file,
    deletion_request_intellectual_object as request_object, work_item,
};
use crate::error::{AppError, AppResult};

use super::DbPool;
use super::work_items::insert_work_item_row;

/// Link objects and files to a request. Existing links are left alone, so
/// repeating the call is harmless.
async fn link_targets<C: ConnectionTrait>(
    db: &C,
    request_id: i32,
    object_ids: &[i32],
    file_ids: &[i32],
) -> AppResult<()> {
    if !object_ids.is_empty() {
        let rows = object_ids.iter().map(|object_id| request_object::ActiveModel {
            deletion_request_id: Set(request_id),
            intellectual_object_id: Set(*object_id),
        });
        request_object::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    request_object::Column::DeletionRequestId,
                    request_object::Column::IntellectualObjectId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await
            .map_err(|e| AppError::Database(format!("Failed to link objects to request: {}", e)))?;
    }

    if !file_ids.is_empty() {
        let rows = file_ids.iter().map(|file_id| request_file::ActiveModel {
            deletion_request_id: Set(request_id),
            generic_file_id: Set(*file_id),
        });
        request_file::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    request_file::Column::DeletionRequestId,
                    request_file::Column::GenericFileId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await
            .map_err(|e| AppError::Database(format!("Failed to link files to request: {}", e)))?;
    }

    Ok(())
}

/// Apply `changes` to a request that is neither confirmed nor cancelled.
/// Returns false when the row was no longer pending.
async fn update_if_pending<C: ConnectionTrait>(
    db: &C,
    request_id: i32,
    changes: ActiveModel,
) -> Result<bool, sea_orm::DbErr> {
    let result = DeletionRequest::update_many()
        .set(changes)
        .filter(deletion_request::Column::Id.eq(request_id))
        .filter(deletion_request::Column::ConfirmedById.is_null())
        .filter(deletion_request::Column::CancelledById.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

fn already_reviewed(request_id: i32) -> AppError {
    AppError::InvalidInput(format!(
        "Deletion request {} has already been approved or cancelled",
        request_id
    ))
}

impl DbPool {
    /// Insert a request together with the objects and files it targets.
    pub async fn insert_deletion_request(
        &self,
        request: deletion_request::Model,
        object_ids: &[i32],
        file_ids: &[i32],
    ) -> AppResult<deletion_request::Model> {
        let txn = self.connection().begin().await?;

        let mut active: ActiveModel = request.into_active_model().reset_all();
        active.id = NotSet;
        let request = active
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert deletion request: {}", e)))?;
        link_targets(&txn, request.id, object_ids, file_ids).await?;

        txn.commit().await?;
        Ok(request)
    }

    pub async fn get_deletion_request(&self, id: i32) -> AppResult<Option<deletion_request::Model>> {
        DeletionRequest::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get deletion request: {}", e)))
    }

    pub async fn deletion_request_for_work_item(
        &self,
        work_item_id: i32,
    ) -> AppResult<Option<deletion_request::Model>> {
        DeletionRequest::find()
            .filter(deletion_request::Column::WorkItemId.eq(work_item_id))
            .one(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get deletion request for work item: {}", e))
            })
    }

    pub async fn deletion_request_object_ids(&self, request_id: i32) -> AppResult<Vec<i32>> {
        let rows = request_object::Entity::find()
            .filter(request_object::Column::DeletionRequestId.eq(request_id))
            .order_by_asc(request_object::Column::IntellectualObjectId)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get request objects: {}", e)))?;
        Ok(rows.into_iter().map(|r| r.intellectual_object_id).collect())
    }

    pub async fn deletion_request_file_ids(&self, request_id: i32) -> AppResult<Vec<i32>> {
        let rows = request_file::Entity::find()
            .filter(request_file::Column::DeletionRequestId.eq(request_id))
            .order_by_asc(request_file::Column::GenericFileId)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get request files: {}", e)))?;
        Ok(rows.into_iter().map(|r| r.generic_file_id).collect())
    }

    /// Store an approved request and its new deletion work item together.
    ///
    /// The request row is only updated while it is still pending. If another
    /// reviewer approved or cancelled it first, nothing is written and the
    /// call fails with [`AppError::InvalidInput`].
    pub async fn save_approved_deletion(
        &self,
        request: deletion_request::Model,
        item: work_item::Model,
    ) -> AppResult<(deletion_request::Model, work_item::Model)> {
        let txn = self.connection().begin().await?;

        let item = insert_work_item_row(&txn, item).await?;
        let changes = ActiveModel {
            confirmed_by_id: Set(request.confirmed_by_id),
            confirmed_at: Set(request.confirmed_at),
            work_item_id: Set(Some(item.id)),
            ..Default::default()
        };
        let updated = update_if_pending(&txn, request.id, changes)
            .await
            .map_err(|e| AppError::Database(format!("Failed to approve deletion request: {}", e)))?;
        if !updated {
            txn.rollback().await?;
            return Err(already_reviewed(request.id));
        }

        txn.commit().await?;
        let request = deletion_request::Model {
            work_item_id: Some(item.id),
            ..request
        };
        Ok((request, item))
    }

    /// Store a request after its canceller and cancellation time are set.
    ///
    /// Like approval, this only succeeds while the request is still pending.
    pub async fn save_cancelled_deletion(
        &self,
        request: deletion_request::Model,
    ) -> AppResult<deletion_request::Model> {
        let changes = ActiveModel {
            cancelled_by_id: Set(request.cancelled_by_id),
            cancelled_at: Set(request.cancelled_at),
            ..Default::default()
        };
        let updated = update_if_pending(self.connection(), request.id, changes)
            .await
            .map_err(|e| AppError::Database(format!("Failed to cancel deletion request: {}", e)))?;
        if !updated {
            return Err(already_reviewed(request.id));
        }
        Ok(request)
    }
}
