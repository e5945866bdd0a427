//! Deletion preconditions and the deletion audit event.
//!
//! An object or file is only marked deleted after an institutional admin
//! approved a deletion request and a Delete work item is in flight for it.
//! The state change and its `deletion` PREMIS event are written in one
//! transaction.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::db::DbPool;
use crate::entity::{
    deletion_request, generic_file, intellectual_object, premis_event, user, work_item,
};
use crate::error::{AppError, AppResult, PreconditionError};
use crate::models::{EventOutcome, EventType, RecordState};

const DELETION_AGENT: &str = "APTrust preservation services";
const DELETION_OBJECT: &str = "Minio S3 library";

/// Everything that backs an approved deletion.
#[derive(Debug, Clone)]
pub struct DeletionApproval {
    pub work_item: work_item::Model,
    pub request: deletion_request::Model,
    pub requested_by: user::Model,
    pub confirmed_by: user::Model,
}

/// What is being deleted; decides which events, work items and requests apply.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Object(&'a intellectual_object::Model),
    File(&'a generic_file::Model),
}

impl Target<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Target::Object(_) => "object",
            Target::File(_) => "file",
        }
    }

    fn id(&self) -> i32 {
        match self {
            Target::Object(obj) => obj.id,
            Target::File(gf) => gf.id,
        }
    }

    fn identifier(&self) -> &str {
        match self {
            Target::Object(obj) => &obj.identifier,
            Target::File(gf) => &gf.identifier,
        }
    }

    fn state(&self) -> &str {
        match self {
            Target::Object(obj) => &obj.state,
            Target::File(gf) => &gf.state,
        }
    }

    async fn last_event(
        &self,
        pool: &DbPool,
        event_type: EventType,
    ) -> AppResult<Option<premis_event::Model>> {
        match self {
            Target::Object(obj) => pool.latest_object_event(obj.id, event_type).await,
            Target::File(gf) => pool.latest_file_event(gf.id, event_type).await,
        }
    }

    /// A file may be removed under its own Delete item or, while the whole
    /// object is being deleted, under the object's.
    async fn active_deletion_item(&self, pool: &DbPool) -> AppResult<Option<work_item::Model>> {
        match self {
            Target::Object(obj) => pool.active_deletion_item_for_object(obj.id).await,
            Target::File(gf) => match pool.active_deletion_item_for_file(gf.id).await? {
                Some(item) => Ok(Some(item)),
                None => {
                    pool.active_deletion_item_for_object(gf.intellectual_object_id)
                        .await
                }
            },
        }
    }

    /// Whether the request behind `item` authorizes deleting this target.
    /// An object-level request must name the object and no files; a file
    /// request must name the file.
    async fn request_covers(
        &self,
        pool: &DbPool,
        request_id: i32,
        item: &work_item::Model,
    ) -> AppResult<bool> {
        let object_ids = pool.deletion_request_object_ids(request_id).await?;
        let file_ids = pool.deletion_request_file_ids(request_id).await?;
        let whole_object = |object_id: i32| object_ids.contains(&object_id) && file_ids.is_empty();

        Ok(match self {
            Target::Object(obj) => whole_object(obj.id),
            Target::File(gf) if item.generic_file_id == Some(gf.id) => file_ids.contains(&gf.id),
            Target::File(gf) => whole_object(gf.intellectual_object_id),
        })
    }
}

fn precondition(err: PreconditionError) -> AppError {
    AppError::DeletionPrecondition(err)
}

/// Fails with `AlreadyDeleted`, `MissingIngestEvent` or
/// `DeletedSinceLastIngest`.
async fn assert_not_already_deleted(pool: &DbPool, target: Target<'_>) -> AppResult<()> {
    if RecordState::parse(target.state()) == Some(RecordState::Deleted) {
        return Err(precondition(PreconditionError::AlreadyDeleted));
    }

    let last_ingest = target
        .last_event(pool, EventType::Ingestion)
        .await?
        .ok_or_else(|| precondition(PreconditionError::MissingIngestEvent))?;

    if let Some(last_deletion) = target.last_event(pool, EventType::Deletion).await?
        && last_deletion.created_at > last_ingest.created_at
    {
        return Err(precondition(PreconditionError::DeletedSinceLastIngest));
    }
    Ok(())
}

/// Locate the approved request behind an in-flight Delete work item.
async fn deletion_approval(pool: &DbPool, target: Target<'_>) -> AppResult<DeletionApproval> {
    let work_item = target
        .active_deletion_item(pool)
        .await?
        .ok_or_else(|| precondition(PreconditionError::MissingWorkItem))?;

    let has_approver = work_item
        .inst_approver
        .as_deref()
        .is_some_and(|email| !email.trim().is_empty());
    if !has_approver {
        return Err(precondition(PreconditionError::MissingApprover {
            work_item_id: work_item.id,
        }));
    }

    let missing_request = || {
        precondition(PreconditionError::MissingDeletionRequest {
            work_item_id: work_item.id,
        })
    };
    let request = pool
        .deletion_request_for_work_item(work_item.id)
        .await?
        .ok_or_else(missing_request)?;
    if !target.request_covers(pool, request.id, &work_item).await? {
        return Err(missing_request());
    }

    let requested_by = match request.requested_by_id {
        id if id > 0 => pool.get_user(id).await?,
        _ => None,
    }
    .ok_or_else(|| {
        precondition(PreconditionError::MissingRequester {
            deletion_request_id: request.id,
        })
    })?;

    let confirmed_by = match request.confirmed_by_id {
        Some(id) => pool.get_user(id).await?,
        None => None,
    }
    .ok_or_else(|| {
        precondition(PreconditionError::MissingConfirmer {
            deletion_request_id: request.id,
        })
    })?;

    Ok(DeletionApproval {
        work_item,
        request,
        requested_by,
        confirmed_by,
    })
}

fn log_failure(target: Target<'_>, err: &AppError) {
    error!(
        "Deletion precondition check failed for {} {} ({}): {}",
        target.kind(),
        target.id(),
        target.identifier(),
        err
    );
}

/// Checks run in order; the first failure is logged and returned.
pub async fn assert_object_deletion_preconditions(
    pool: &DbPool,
    obj: &intellectual_object::Model,
) -> AppResult<DeletionApproval> {
    let target = Target::Object(obj);
    let result = async {
        if pool.count_active_files(obj.id).await? > 0 {
            return Err(precondition(PreconditionError::ActiveFilesExist));
        }
        assert_not_already_deleted(pool, target).await?;
        deletion_approval(pool, target).await
    }
    .await;

    if let Err(ref e) = result {
        log_failure(target, e);
    }
    result
}

/// Same as the object checks, minus the active-files check.
pub async fn assert_file_deletion_preconditions(
    pool: &DbPool,
    gf: &generic_file::Model,
) -> AppResult<DeletionApproval> {
    let target = Target::File(gf);
    let result = async {
        assert_not_already_deleted(pool, target).await?;
        deletion_approval(pool, target).await
    }
    .await;

    if let Err(ref e) = result {
        log_failure(target, e);
    }
    result
}

fn deletion_event(
    kind: &str,
    approval: &DeletionApproval,
    institution_id: i32,
    intellectual_object_id: i32,
    generic_file_id: Option<i32>,
    now: DateTime<Utc>,
) -> premis_event::Model {
    let requester = &approval.requested_by.email;
    let approver = &approval.confirmed_by.email;
    premis_event::Model {
        id: 0,
        identifier: uuid::Uuid::new_v4().to_string(),
        event_type: EventType::Deletion.as_str().to_string(),
        date_time: now,
        detail: format!("{} deleted from preservation storage", kind),
        outcome: EventOutcome::Success.as_str().to_string(),
        outcome_detail: requester.clone(),
        outcome_information: format!(
            "{} deleted at the request of {}. Institutional approver: {}.",
            kind, requester, approver
        ),
        object: DELETION_OBJECT.to_string(),
        agent: DELETION_AGENT.to_string(),
        intellectual_object_id,
        generic_file_id,
        institution_id,
        created_at: now,
        updated_at: now,
    }
}

/// Build the deletion event for an object.
///
/// The approval is looked up again so a request cancelled since the
/// precondition check cannot produce an event.
pub async fn new_object_deletion_event(
    pool: &DbPool,
    obj: &intellectual_object::Model,
) -> AppResult<premis_event::Model> {
    let approval = deletion_approval(pool, Target::Object(obj)).await?;
    Ok(deletion_event(
        "Object",
        &approval,
        obj.institution_id,
        obj.id,
        None,
        Utc::now(),
    ))
}

/// Build the deletion event for a file.
pub async fn new_file_deletion_event(
    pool: &DbPool,
    gf: &generic_file::Model,
) -> AppResult<premis_event::Model> {
    let approval = deletion_approval(pool, Target::File(gf)).await?;
    Ok(deletion_event(
        "File",
        &approval,
        gf.institution_id,
        gf.intellectual_object_id,
        Some(gf.id),
        Utc::now(),
    ))
}

/// Mark an object deleted and record its deletion event atomically.
pub async fn delete_object(
    pool: &DbPool,
    obj: intellectual_object::Model,
) -> AppResult<(intellectual_object::Model, premis_event::Model)> {
    assert_object_deletion_preconditions(pool, &obj).await?;

    let mut obj = obj;
    obj.state = RecordState::Deleted.as_str().to_string();
    obj.updated_at = Utc::now();
    obj.validate()?;

    let event = new_object_deletion_event(pool, &obj).await?;
    event.validate()?;

    let object_id = obj.id;
    let (obj, event) = pool.save_object_deletion(obj, event).await.inspect_err(|e| {
        error!("Object deletion transaction failed for object {}: {}", object_id, e)
    })?;
    info!(
        object_id = obj.id,
        identifier = %obj.identifier,
        event = %event.identifier,
        "Object deleted"
    );
    Ok((obj, event))
}

/// Mark a file deleted and record its deletion event atomically.
pub async fn delete_file(
    pool: &DbPool,
    gf: generic_file::Model,
) -> AppResult<(generic_file::Model, premis_event::Model)> {
    assert_file_deletion_preconditions(pool, &gf).await?;

    let mut gf = gf;
    gf.state = RecordState::Deleted.as_str().to_string();
    gf.updated_at = Utc::now();
    gf.validate()?;

    let event = new_file_deletion_event(pool, &gf).await?;
    event.validate()?;

    let file_id = gf.id;
    let (gf, event) = pool.save_file_deletion(gf, event).await.inspect_err(|e| {
        error!("File deletion transaction failed for file {}: {}", file_id, e)
    })?;
    info!(
        generic_file_id = gf.id,
        identifier = %gf.identifier,
        event = %event.identifier,
        "File deleted"
    );
    Ok((gf, event))
}
