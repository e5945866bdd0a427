//! Requeueing work items to an earlier stage.

use std::sync::Arc;

use preservation_registry::error::AppError;
use preservation_registry::models::Stage;
use preservation_registry::services::work_items;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_requeue_to_ingest_stage() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;

    let mut item = save_work_item(&pool, &obj, "Ingest", "Store", "Failed").await;
    item.node = Some("worker-7".to_string());
    item.pid = 3121;
    item.retry = false;
    item.needs_admin_review = true;
    item.outcome = "Storage write timed out".to_string();
    let item = pool.save_work_item(item).await.unwrap();

    let requeued =
        work_items::requeue_work_item(&pool, queue.as_ref(), item.clone(), Stage::Validate)
            .await
            .unwrap();
    assert_eq!(requeued.id, item.id);
    assert_eq!(requeued.stage, "Validate");
    assert_eq!(requeued.status, "Pending");
    assert!(requeued.retry);
    assert!(!requeued.needs_admin_review);
    assert_eq!(requeued.node, None);
    assert_eq!(requeued.pid, 0);
    assert_eq!(requeued.outcome, "");
    assert_eq!(requeued.note, "Requeued for Validate");
    assert!(requeued.queued_at.is_some());
    assert_eq!(
        queue.published(),
        vec![("ingest02_bag_validation".to_string(), item.id)]
    );

    let stored = pool.get_work_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored.stage, "Validate");
    assert!(stored.queued_at.is_some());
}

#[actix_rt::test]
async fn test_invalid_stage_leaves_item_unchanged() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let item = save_work_item(&pool, &obj, "Ingest", "Store", "Failed").await;

    let err = work_items::requeue_work_item(&pool, queue.as_ref(), item.clone(), Stage::Package)
        .await
        .unwrap_err();
    match err {
        AppError::InvalidRequeue { action, stage } => {
            assert_eq!(action, "Ingest");
            assert_eq!(stage, "Package");
        }
        other => panic!("expected InvalidRequeue, got {other:?}"),
    }

    let stored = pool.get_work_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored.stage, "Store");
    assert_eq!(stored.status, "Failed");
    assert_eq!(stored.note, item.note);
    assert!(stored.queued_at.is_none());
    assert!(queue.published().is_empty());
}

#[actix_rt::test]
async fn test_requeue_deletion_to_resolve() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let item = save_work_item(&pool, &obj, "Delete", "Requested", "Started").await;

    let requeued = work_items::requeue_work_item(&pool, queue.as_ref(), item, Stage::Resolve)
        .await
        .unwrap();
    assert_eq!(requeued.stage, "Resolve");
    assert_eq!(
        queue.published(),
        vec![("delete_item".to_string(), requeued.id)]
    );
}

#[actix_rt::test]
async fn test_requeue_options_for_ingest_at_store() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let item = save_work_item(&pool, &obj, "Ingest", "Store", "Failed").await;

    assert_eq!(
        item.requeue_options(),
        vec![
            Stage::Receive,
            Stage::Validate,
            Stage::ReingestCheck,
            Stage::CopyToStaging,
            Stage::FormatIdentification,
            Stage::Store,
        ]
    );
}

#[actix_rt::test]
async fn test_update_cannot_change_action() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let mut item = save_work_item(&pool, &obj, "Ingest", "Store", "Started").await;

    item.action = "Delete".to_string();
    item.stage = "Requested".to_string();
    let err = pool.save_work_item(item).await.unwrap_err();
    match err {
        AppError::Validation(errors) => assert!(errors.get("action").is_some()),
        other => panic!("expected a validation error, got {other:?}"),
    }
}
