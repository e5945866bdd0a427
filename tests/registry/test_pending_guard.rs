//! Restorations and deletions are refused while other work is in flight.

use std::sync::Arc;

use chrono::Utc;

use preservation_registry::error::AppError;
use preservation_registry::services::{deletion_workflow, work_items};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_reingest_in_progress_blocks_object_requests() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    save_work_item(&pool, &obj, "Ingest", "Store", "Started").await;

    let err =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::PendingWorkItems));
    assert!(
        pool.alerts_for_user(&depositor.admin)
            .await
            .unwrap()
            .is_empty()
    );

    let err =
        work_items::initiate_object_restoration(&pool, queue.as_ref(), &obj, &depositor.user)
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::PendingWorkItems));
    assert!(queue.published().is_empty());
}

#[actix_rt::test]
async fn test_finished_work_does_not_block() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    save_work_item(&pool, &obj, "Restore Object", "Available in S3", "Success").await;
    save_work_item(&pool, &obj, "Ingest", "Validate", "Failed").await;

    let item =
        work_items::initiate_object_restoration(&pool, queue.as_ref(), &obj, &depositor.user)
            .await
            .unwrap();
    assert_eq!(item.action, "Restore Object");
    assert_eq!(item.stage, "Requested");
    assert_eq!(item.status, "Pending");
    assert_eq!(item.user, depositor.user.email);
    assert_eq!(queue.published(), vec![("restore_object".to_string(), item.id)]);

    // The restoration just queued now blocks the next request.
    let pending = pool
        .work_items_pending_for_object(obj.institution_id, &obj.bag_name)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, item.id);
}

#[actix_rt::test]
async fn test_same_bag_name_elsewhere_does_not_block() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let stranger = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let mut other = work_item_request(&obj, "Ingest", "Receive", "Pending").into_model(Utc::now());
    other.institution_id = stranger.institution.id;
    other.intellectual_object_id = None;
    pool.save_work_item(other).await.unwrap();

    assert!(
        work_items::ensure_no_pending_for_object(&pool, &obj)
            .await
            .is_ok()
    );
}

#[actix_rt::test]
async fn test_pending_file_work_blocks_file_requests() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    let gf = create_file(&pool, &obj).await;

    let mut restore = work_item_request(&obj, "Restore File", "Restoring", "Started")
        .into_model(Utc::now());
    restore.generic_file_id = Some(gf.id);
    pool.save_work_item(restore).await.unwrap();

    let err = deletion_workflow::initiate_file_deletion(&pool, TEST_BASE_URL, &depositor.user, &gf)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PendingWorkItems));

    let err =
        work_items::initiate_file_restoration(&pool, queue.as_ref(), &obj, &gf, &depositor.user)
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::PendingWorkItems));

    // Another file of the same object is free.
    let sibling = create_file(&pool, &obj).await;
    let item =
        work_items::initiate_file_restoration(&pool, queue.as_ref(), &obj, &sibling, &depositor.user)
            .await
            .unwrap();
    assert_eq!(item.action, "Restore File");
    assert_eq!(item.generic_file_id, Some(sibling.id));
    assert_eq!(queue.published(), vec![("restore_file".to_string(), item.id)]);
}
