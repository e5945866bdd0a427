//! Deletion request workflow: request, review, approve or cancel.
//!
//! A depositor asks for a deletion. Institutional admins receive an alert
//! carrying a one-time review link. Approving creates the Delete work item
//! and queues it; the worker later calls back to finish the deletion.

use chrono::Utc;
use tracing::{info, warn};

use crate::db::DbPool;
use crate::entity::{alert, deletion_request, generic_file, intellectual_object, user, work_item};
use crate::error::{AppError, AppResult};
use crate::models::{AlertType, DeletionParticipants, DeletionRequestStatus, DeletionRequestView};
use crate::services::queue::QueueClient;
use crate::services::{token, work_items};

/// Link an admin follows to review a request.
pub fn review_url(base_url: &str, request_id: i32, token: &str) -> String {
    format!(
        "{}/deletions/{}/review?token={}",
        base_url.trim_end_matches('/'),
        request_id,
        urlencoding::encode(token)
    )
}

/// Store an alert for every active institutional admin of the institution.
async fn alert_admins(
    pool: &DbPool,
    institution_id: i32,
    alert_type: AlertType,
    subject: String,
    content: String,
    request_id: i32,
) -> AppResult<alert::Model> {
    let admins = pool.list_institutional_admins(institution_id).await?;
    if admins.is_empty() {
        warn!(
            institution_id,
            deletion_request_id = request_id,
            "No institutional admins to alert"
        );
    }
    let recipients: Vec<i32> = admins.iter().map(|u| u.id).collect();

    pool.insert_alert(
        alert::Model {
            id: 0,
            institution_id,
            alert_type: alert_type.as_str().to_string(),
            subject,
            content,
            deletion_request_id: Some(request_id),
            work_item_id: None,
            created_at: Utc::now(),
        },
        &recipients,
    )
    .await
}

fn ensure_same_institution(user: &user::Model, institution_id: i32, what: &str) -> AppResult<()> {
    if user.institution_id != institution_id {
        return Err(AppError::Forbidden(format!(
            "User {} cannot request deletion of {} at another institution",
            user.email, what
        )));
    }
    Ok(())
}

async fn create_request(
    pool: &DbPool,
    base_url: &str,
    requester: &user::Model,
    institution_id: i32,
    object_ids: &[i32],
    file_ids: &[i32],
    identifier: &str,
) -> AppResult<deletion_request::Model> {
    let issued = token::issue()?;
    let now = Utc::now();
    let request = deletion_request::Model {
        id: 0,
        institution_id,
        requested_by_id: requester.id,
        requested_at: now,
        encrypted_confirmation_token: issued.encrypted,
        confirmed_by_id: None,
        confirmed_at: None,
        cancelled_by_id: None,
        cancelled_at: None,
        work_item_id: None,
    };
    request.validate(DeletionParticipants {
        requester: Some(requester),
        ..Default::default()
    })?;

    let request = pool
        .insert_deletion_request(request, object_ids, file_ids)
        .await?;

    let link = review_url(base_url, request.id, &issued.plaintext);
    alert_admins(
        pool,
        institution_id,
        AlertType::DeletionRequested,
        format!("Deletion requested for {}", identifier),
        format!(
            "{} has requested deletion of {}. To review and approve or cancel this request, visit {}",
            requester.email, identifier, link
        ),
        request.id,
    )
    .await?;

    info!(
        deletion_request_id = request.id,
        requested_by = %requester.email,
        identifier,
        "Deletion requested"
    );
    Ok(request)
}

/// Start a deletion request for a whole object.
pub async fn initiate_object_deletion(
    pool: &DbPool,
    base_url: &str,
    requester: &user::Model,
    obj: &intellectual_object::Model,
) -> AppResult<deletion_request::Model> {
    ensure_same_institution(requester, obj.institution_id, "an object")?;
    if !obj.is_active() {
        return Err(AppError::InvalidInput(format!(
            "Object {} is already deleted",
            obj.identifier
        )));
    }
    work_items::ensure_no_pending_for_object(pool, obj).await?;

    create_request(
        pool,
        base_url,
        requester,
        obj.institution_id,
        &[obj.id],
        &[],
        &obj.identifier,
    )
    .await
}

/// Start a deletion request for one file.
pub async fn initiate_file_deletion(
    pool: &DbPool,
    base_url: &str,
    requester: &user::Model,
    gf: &generic_file::Model,
) -> AppResult<deletion_request::Model> {
    ensure_same_institution(requester, gf.institution_id, "a file")?;
    if !gf.is_active() {
        return Err(AppError::InvalidInput(format!(
            "File {} is already deleted",
            gf.identifier
        )));
    }
    work_items::ensure_no_pending_for_file(pool, gf).await?;

    create_request(
        pool,
        base_url,
        requester,
        gf.institution_id,
        &[],
        &[gf.id],
        &gf.identifier,
    )
    .await
}

async fn load_request(pool: &DbPool, id: i32) -> AppResult<deletion_request::Model> {
    pool.get_deletion_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Deletion request {}", id)))
}

async fn load_user(pool: &DbPool, id: i32) -> AppResult<user::Model> {
    pool.get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
}

/// Common gate for approve and cancel.
fn ensure_reviewable(
    request: &deletion_request::Model,
    token_str: &str,
    admin: &user::Model,
) -> AppResult<()> {
    token::require_match(token_str, &request.encrypted_confirmation_token)?;

    if admin.institution_id != request.institution_id || !admin.is_inst_admin() {
        return Err(AppError::Forbidden(format!(
            "Only an institutional admin of institution {} may review this request",
            request.institution_id
        )));
    }
    match request.status() {
        DeletionRequestStatus::Pending => Ok(()),
        DeletionRequestStatus::Approved => Err(AppError::InvalidInput(format!(
            "Deletion request {} has already been approved",
            request.id
        ))),
        DeletionRequestStatus::Cancelled => Err(AppError::InvalidInput(format!(
            "Deletion request {} has been cancelled",
            request.id
        ))),
    }
}

/// Load a request for review. The token must match.
pub async fn review(pool: &DbPool, id: i32, token_str: &str) -> AppResult<DeletionRequestView> {
    let request = load_request(pool, id).await?;
    token::require_match(token_str, &request.encrypted_confirmation_token)?;
    describe(pool, request).await
}

/// The one item an approved request deletes.
enum DeletionTarget {
    Object(intellectual_object::Model),
    File(intellectual_object::Model, generic_file::Model),
}

async fn single_target(
    pool: &DbPool,
    request: &deletion_request::Model,
) -> AppResult<DeletionTarget> {
    let object_ids = pool.deletion_request_object_ids(request.id).await?;
    let file_ids = pool.deletion_request_file_ids(request.id).await?;

    match (object_ids.as_slice(), file_ids.as_slice()) {
        ([object_id], []) => {
            let obj = pool
                .get_intellectual_object(*object_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Intellectual object {}", object_id)))?;
            Ok(DeletionTarget::Object(obj))
        }
        ([], [file_id]) => {
            let gf = pool
                .get_generic_file(*file_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Generic file {}", file_id)))?;
            let obj = pool
                .get_intellectual_object(gf.intellectual_object_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Intellectual object {}", gf.intellectual_object_id))
                })?;
            Ok(DeletionTarget::File(obj, gf))
        }
        _ => Err(AppError::InvalidInput(format!(
            "Deletion request {} must name exactly one object or exactly one file",
            request.id
        ))),
    }
}

/// Approve a request: record the confirmer, create the Delete work item in
/// the same transaction, then queue it.
pub async fn approve(
    pool: &DbPool,
    queue: &dyn QueueClient,
    id: i32,
    token_str: &str,
    admin: &user::Model,
) -> AppResult<(deletion_request::Model, work_item::Model)> {
    let mut request = load_request(pool, id).await?;
    ensure_reviewable(&request, token_str, admin)?;

    let requester = load_user(pool, request.requested_by_id).await?;
    let target = single_target(pool, &request).await?;
    let (item, identifier) = match &target {
        DeletionTarget::Object(obj) => (
            work_items::new_deletion_item(pool, obj, None, &requester, admin).await?,
            obj.identifier.clone(),
        ),
        DeletionTarget::File(obj, gf) => (
            work_items::new_deletion_item(pool, obj, Some(gf), &requester, admin).await?,
            gf.identifier.clone(),
        ),
    };
    item.validate()?;

    request.confirmed_by_id = Some(admin.id);
    request.confirmed_at = Some(Utc::now());
    request.validate(DeletionParticipants {
        requester: Some(&requester),
        confirmer: Some(admin),
        canceller: None,
    })?;

    let (request, item) = pool.save_approved_deletion(request, item).await?;
    info!(
        deletion_request_id = request.id,
        work_item_id = item.id,
        approved_by = %admin.email,
        "Deletion approved"
    );

    let item = work_items::enqueue(pool, queue, item).await?;

    alert_admins(
        pool,
        request.institution_id,
        AlertType::DeletionConfirmed,
        format!("Deletion confirmed for {}", identifier),
        format!(
            "{} approved the deletion of {} requested by {}. Work item {} has been queued.",
            admin.email, identifier, requester.email, item.id
        ),
        request.id,
    )
    .await?;

    Ok((request, item))
}

/// Cancel a pending request.
pub async fn cancel(
    pool: &DbPool,
    id: i32,
    token_str: &str,
    admin: &user::Model,
) -> AppResult<deletion_request::Model> {
    let mut request = load_request(pool, id).await?;
    ensure_reviewable(&request, token_str, admin)?;

    let requester = load_user(pool, request.requested_by_id).await?;
    request.cancelled_by_id = Some(admin.id);
    request.cancelled_at = Some(Utc::now());
    request.validate(DeletionParticipants {
        requester: Some(&requester),
        confirmer: None,
        canceller: Some(admin),
    })?;

    let request = pool.save_cancelled_deletion(request).await?;
    info!(
        deletion_request_id = request.id,
        cancelled_by = %admin.email,
        "Deletion cancelled"
    );

    alert_admins(
        pool,
        request.institution_id,
        AlertType::DeletionCancelled,
        format!("Deletion request {} cancelled", request.id),
        format!(
            "{} cancelled the deletion requested by {}.",
            admin.email, requester.email
        ),
        request.id,
    )
    .await?;

    Ok(request)
}

async fn email_of(pool: &DbPool, id: Option<i32>) -> AppResult<Option<String>> {
    match id {
        Some(id) => Ok(pool.get_user(id).await?.map(|u| u.email)),
        None => Ok(None),
    }
}

/// Request with emails and targets filled in.
pub async fn describe(
    pool: &DbPool,
    request: deletion_request::Model,
) -> AppResult<DeletionRequestView> {
    let requested_by = email_of(pool, Some(request.requested_by_id))
        .await?
        .unwrap_or_default();
    Ok(DeletionRequestView {
        id: request.id,
        institution_id: request.institution_id,
        status: request.status(),
        requested_by,
        requested_at: request.requested_at,
        confirmed_by: email_of(pool, request.confirmed_by_id).await?,
        confirmed_at: request.confirmed_at,
        cancelled_by: email_of(pool, request.cancelled_by_id).await?,
        cancelled_at: request.cancelled_at,
        work_item_id: request.work_item_id,
        intellectual_object_ids: pool.deletion_request_object_ids(request.id).await?,
        generic_file_ids: pool.deletion_request_file_ids(request.id).await?,
    })
}
