//! Work item lifecycle: requeueing, factories for restore and delete items,
//! the pending-work guard and publishing to the queue.

use chrono::Utc;
use tracing::{info, warn};

use crate::db::DbPool;
use crate::entity::{generic_file, intellectual_object, user, work_item};
use crate::error::{AppError, AppResult};
use crate::models::{Stage, WorkItemAction, WorkItemStatus, topic_for};
use crate::services::queue::QueueClient;

const NOT_STARTED: &str = "Not started";

fn action_of(item: &work_item::Model) -> AppResult<WorkItemAction> {
    item.action_kind().ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Work item {} has unknown action '{}'",
            item.id, item.action
        ))
    })
}

/// Send an item back to `stage` and store it.
///
/// The stage must have a queue topic for the item's action; otherwise the
/// item is left untouched and [`AppError::InvalidRequeue`] is returned.
pub async fn set_for_requeue(
    pool: &DbPool,
    item: work_item::Model,
    stage: Stage,
) -> AppResult<work_item::Model> {
    let action = action_of(&item).map_err(|_| AppError::InvalidRequeue {
        action: item.action.clone(),
        stage: stage.as_str().to_string(),
    })?;
    topic_for(action, stage)?;

    let mut item = item;
    item.stage = stage.as_str().to_string();
    item.status = WorkItemStatus::Pending.as_str().to_string();
    item.retry = true;
    item.needs_admin_review = false;
    item.node = None;
    item.outcome = String::new();
    item.pid = 0;
    item.note = format!("Requeued for {}", stage);

    pool.save_work_item(item).await
}

/// Publish an item on the topic serving its current stage and record when.
pub async fn enqueue(
    pool: &DbPool,
    queue: &dyn QueueClient,
    item: work_item::Model,
) -> AppResult<work_item::Model> {
    let action = action_of(&item)?;
    let stage = item.stage_kind().ok_or_else(|| AppError::InvalidRequeue {
        action: item.action.clone(),
        stage: item.stage.clone(),
    })?;
    let topic = topic_for(action, stage)?;

    queue.enqueue(topic, item.id).await?;
    info!(work_item_id = item.id, topic, "Work item queued");

    pool.mark_work_item_queued(item, Utc::now()).await
}

/// Requeue to `stage` and publish.
pub async fn requeue_work_item(
    pool: &DbPool,
    queue: &dyn QueueClient,
    item: work_item::Model,
    stage: Stage,
) -> AppResult<work_item::Model> {
    let item = set_for_requeue(pool, item, stage).await?;
    enqueue(pool, queue, item).await
}

/// Fail with [`AppError::PendingWorkItems`] if anything is still working on
/// the object's bag.
///
/// This is a read followed by a decision, with no lock held in between.
pub async fn ensure_no_pending_for_object(
    pool: &DbPool,
    obj: &intellectual_object::Model,
) -> AppResult<()> {
    let pending = pool
        .work_items_pending_for_object(obj.institution_id, &obj.bag_name)
        .await?;
    if let Some(item) = pending.first() {
        warn!(
            object_id = obj.id,
            pending = pending.len(),
            latest = item.id,
            "Object has pending work items"
        );
        return Err(AppError::PendingWorkItems);
    }
    Ok(())
}

/// File counterpart of [`ensure_no_pending_for_object`].
pub async fn ensure_no_pending_for_file(pool: &DbPool, gf: &generic_file::Model) -> AppResult<()> {
    let pending = pool.work_items_pending_for_file(gf.id).await?;
    if let Some(item) = pending.first() {
        warn!(
            generic_file_id = gf.id,
            pending = pending.len(),
            latest = item.id,
            "File has pending work items"
        );
        return Err(AppError::PendingWorkItems);
    }
    Ok(())
}

/// Copy of the object's last successful ingest with progress reset.
///
/// The copy is unsaved and still says `Ingest`; callers set the action,
/// user and file before storing it.
pub async fn new_item_from_last_successful_ingest(
    pool: &DbPool,
    object_id: i32,
) -> AppResult<work_item::Model> {
    let last = pool.last_successful_ingest(object_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Successful ingest for object {}", object_id))
    })?;
    Ok(reset_progress(last, Utc::now()))
}

fn reset_progress(mut item: work_item::Model, now: chrono::DateTime<Utc>) -> work_item::Model {
    item.id = 0;
    item.created_at = now;
    item.updated_at = now;
    item.date_processed = now;
    item.needs_admin_review = false;
    item.node = None;
    item.note = NOT_STARTED.to_string();
    item.outcome = NOT_STARTED.to_string();
    item.pid = 0;
    item.queued_at = None;
    item.retry = true;
    item.stage = Stage::Requested.as_str().to_string();
    item.stage_started_at = None;
    item.status = WorkItemStatus::Pending.as_str().to_string();
    item.aptrust_approver = None;
    item.inst_approver = None;
    item
}

/// Unsaved restoration item for an object, or for one of its files.
pub async fn new_restoration_item(
    pool: &DbPool,
    obj: &intellectual_object::Model,
    gf: Option<&generic_file::Model>,
    user: &user::Model,
) -> AppResult<work_item::Model> {
    let mut item = new_item_from_last_successful_ingest(pool, obj.id).await?;

    let action = if obj.is_glacier_only() {
        WorkItemAction::GlacierRestore
    } else if gf.is_some() {
        WorkItemAction::RestoreFile
    } else {
        WorkItemAction::RestoreObject
    };
    item.action = action.as_str().to_string();
    item.stage = action.initial_stage().as_str().to_string();
    if let Some(gf) = gf {
        item.generic_file_id = Some(gf.id);
        item.size = gf.size;
    }
    item.user = user.email.clone();
    Ok(item)
}

/// Unsaved Delete item for an object, or for one of its files.
///
/// Both users must belong to the object's institution and the approver must
/// be one of its institutional admins.
pub async fn new_deletion_item(
    pool: &DbPool,
    obj: &intellectual_object::Model,
    gf: Option<&generic_file::Model>,
    requested_by: &user::Model,
    approved_by: &user::Model,
) -> AppResult<work_item::Model> {
    if requested_by.institution_id != obj.institution_id {
        return Err(AppError::Forbidden(format!(
            "user {} at institution {} can't request deletion of object belonging to institution {}",
            requested_by.email, requested_by.institution_id, obj.institution_id
        )));
    }
    if approved_by.institution_id != obj.institution_id {
        return Err(AppError::Forbidden(format!(
            "user {} at institution {} can't approve deletion of object belonging to institution {}",
            approved_by.email, approved_by.institution_id, obj.institution_id
        )));
    }
    if !approved_by.is_inst_admin() {
        return Err(AppError::Forbidden(format!(
            "user {} can't approve deletion of object {} because user is not an admin at the object's institution",
            approved_by.email, obj.id
        )));
    }

    let mut item = new_item_from_last_successful_ingest(pool, obj.id).await?;
    if let Some(gf) = gf {
        item.generic_file_id = Some(gf.id);
        item.size = gf.size;
    }
    item.action = WorkItemAction::Delete.as_str().to_string();
    item.stage = WorkItemAction::Delete.initial_stage().as_str().to_string();
    item.user = requested_by.email.clone();
    item.inst_approver = Some(approved_by.email.clone());
    Ok(item)
}

/// Create, store and publish a restoration of the whole object.
pub async fn initiate_object_restoration(
    pool: &DbPool,
    queue: &dyn QueueClient,
    obj: &intellectual_object::Model,
    user: &user::Model,
) -> AppResult<work_item::Model> {
    if !obj.is_active() {
        return Err(AppError::InvalidInput(format!(
            "Object {} is deleted and cannot be restored",
            obj.identifier
        )));
    }
    ensure_no_pending_for_object(pool, obj).await?;

    let item = new_restoration_item(pool, obj, None, user).await?;
    let item = pool.save_work_item(item).await?;
    info!(
        work_item_id = item.id,
        object_id = obj.id,
        action = %item.action,
        "Restoration requested"
    );
    enqueue(pool, queue, item).await
}

/// Create, store and publish a restoration of one file.
pub async fn initiate_file_restoration(
    pool: &DbPool,
    queue: &dyn QueueClient,
    obj: &intellectual_object::Model,
    gf: &generic_file::Model,
    user: &user::Model,
) -> AppResult<work_item::Model> {
    if !gf.is_active() {
        return Err(AppError::InvalidInput(format!(
            "File {} is deleted and cannot be restored",
            gf.identifier
        )));
    }
    ensure_no_pending_for_file(pool, gf).await?;

    let item = new_restoration_item(pool, obj, Some(gf), user).await?;
    let item = pool.save_work_item(item).await?;
    info!(
        work_item_id = item.id,
        generic_file_id = gf.id,
        action = %item.action,
        "File restoration requested"
    );
    enqueue(pool, queue, item).await
}

/// Restore an object as its institution's next spot test.
///
/// The item is remembered on the institution so that its success raises a
/// restoration alert.
pub async fn initiate_spot_test(
    pool: &DbPool,
    queue: &dyn QueueClient,
    obj: &intellectual_object::Model,
    user: &user::Model,
) -> AppResult<work_item::Model> {
    let inst = pool
        .get_institution(obj.institution_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Institution {}", obj.institution_id)))?;
    if inst.spot_restore_frequency <= 0 {
        return Err(AppError::InvalidInput(format!(
            "Institution {} does not run restoration spot tests",
            inst.identifier
        )));
    }

    let item = initiate_object_restoration(pool, queue, obj, user).await?;
    pool.set_last_spot_restore_item(inst, item.id).await?;
    info!(
        work_item_id = item.id,
        object_id = obj.id,
        "Spot test restoration started"
    );
    Ok(item)
}
