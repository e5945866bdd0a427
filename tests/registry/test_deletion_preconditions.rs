//! Deletion precondition ordering and the atomic delete.

use chrono::{Duration, Utc};

use preservation_registry::error::{AppError, PreconditionError};
use preservation_registry::services::deletion;

use super::test_helpers::*;

fn precondition(err: AppError) -> PreconditionError {
    match err {
        AppError::DeletionPrecondition(p) => p,
        other => panic!("expected a deletion precondition error, got {other:?}"),
    }
}

/// Active files are reported before anything else, even when every other
/// check would also fail.
#[actix_rt::test]
async fn test_active_files_checked_first() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    create_file(&pool, &obj).await;

    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(precondition(err), PreconditionError::ActiveFilesExist);
}

#[actix_rt::test]
async fn test_deleted_object_is_already_deleted() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let mut obj = create_object(&pool, &depositor.institution).await;
    obj.state = "D".to_string();

    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(precondition(err), PreconditionError::AlreadyDeleted);
}

#[actix_rt::test]
async fn test_object_without_ingest_event() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;

    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(precondition(err), PreconditionError::MissingIngestEvent);
}

#[actix_rt::test]
async fn test_deletion_event_after_last_ingest() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    record_event(&pool, "deletion", &obj, None, Utc::now()).await;

    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(precondition(err), PreconditionError::DeletedSinceLastIngest);
}

#[actix_rt::test]
async fn test_reingest_after_deletion_is_deletable_again() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let now = Utc::now();
    record_event(&pool, "ingestion", &obj, None, now - Duration::hours(3)).await;
    record_event(&pool, "deletion", &obj, None, now - Duration::hours(2)).await;
    record_event(&pool, "ingestion", &obj, None, now - Duration::hours(1)).await;

    // Passes the deleted-since-ingest check and stops at the work item.
    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(precondition(err), PreconditionError::MissingWorkItem);
}

#[actix_rt::test]
async fn test_work_item_needs_approver() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    let item = save_work_item(&pool, &obj, "Delete", "Requested", "Pending").await;

    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(
        precondition(err),
        PreconditionError::MissingApprover {
            work_item_id: item.id
        }
    );
}

#[actix_rt::test]
async fn test_work_item_needs_deletion_request() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    let mut item = save_work_item(&pool, &obj, "Delete", "Requested", "Pending").await;
    item.inst_approver = Some(depositor.admin.email.clone());
    let item = pool.save_work_item(item).await.unwrap();

    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(
        precondition(err),
        PreconditionError::MissingDeletionRequest {
            work_item_id: item.id
        }
    );
}

#[actix_rt::test]
async fn test_deletion_request_needs_confirmer() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let request = pool
        .insert_deletion_request(unconfirmed_request(&depositor), &[obj.id], &[])
        .await
        .unwrap();
    let mut item = work_item_request(&obj, "Delete", "Requested", "Pending").into_model(Utc::now());
    item.inst_approver = Some(depositor.admin.email.clone());
    let (request, _) = pool.save_approved_deletion(request, item).await.unwrap();

    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(
        precondition(err),
        PreconditionError::MissingConfirmer {
            deletion_request_id: request.id
        }
    );
}

/// A request naming only files does not authorize deleting an object.
#[actix_rt::test]
async fn test_file_request_does_not_cover_object() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    let other = create_object(&pool, &depositor.institution).await;
    let gf = create_file(&pool, &other).await;

    let mut request = pool
        .insert_deletion_request(unconfirmed_request(&depositor), &[], &[gf.id])
        .await
        .unwrap();
    request.confirmed_by_id = Some(depositor.admin.id);
    request.confirmed_at = Some(Utc::now());
    let mut item = work_item_request(&obj, "Delete", "Requested", "Pending").into_model(Utc::now());
    item.inst_approver = Some(depositor.admin.email.clone());
    let (_, item) = pool.save_approved_deletion(request, item).await.unwrap();

    let err = deletion::assert_object_deletion_preconditions(&pool, &obj)
        .await
        .unwrap_err();
    assert_eq!(
        precondition(err),
        PreconditionError::MissingDeletionRequest {
            work_item_id: item.id
        }
    );
}
