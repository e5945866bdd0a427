//! Request, approve, cancel and finish deletions end to end.

use std::sync::Arc;

use chrono::{Duration, Utc};

use preservation_registry::db::DbPool;
use preservation_registry::entity::user;
use preservation_registry::error::{AppError, PreconditionError};
use preservation_registry::models::{DeletionRequestStatus, EventType};
use preservation_registry::services::{deletion, deletion_workflow};

use super::test_helpers::*;

/// Token from the review link in the newest alert that carries one.
async fn review_token(pool: &DbPool, admin: &user::Model) -> String {
    let alerts = pool.alerts_for_user(admin).await.unwrap();
    let alert = alerts
        .iter()
        .find(|a| a.content.contains("token="))
        .expect("admin was alerted with a review link");
    token_from_alert(&alert.content)
}

#[actix_rt::test]
async fn test_object_deletion_end_to_end() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let request =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
            .await
            .unwrap();
    assert_eq!(request.status(), DeletionRequestStatus::Pending);
    assert!(!request.encrypted_confirmation_token.is_empty());

    let alerts = pool.alerts_for_user(&depositor.admin).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].content.contains(&format!(
        "{}/deletions/{}/review?token=",
        TEST_BASE_URL, request.id
    )));
    let token = review_token(&pool, &depositor.admin).await;
    assert_ne!(token, request.encrypted_confirmation_token);

    let (request, item) =
        deletion_workflow::approve(&pool, queue.as_ref(), request.id, &token, &depositor.admin)
            .await
            .unwrap();
    assert_eq!(request.status(), DeletionRequestStatus::Approved);
    assert_eq!(request.work_item_id, Some(item.id));
    assert_eq!(item.action, "Delete");
    assert_eq!(item.stage, "Requested");
    assert_eq!(item.status, "Pending");
    assert_eq!(item.user, depositor.user.email);
    assert_eq!(item.inst_approver.as_deref(), Some(depositor.admin.email.as_str()));
    assert!(item.queued_at.is_some());
    assert_eq!(queue.published(), vec![("delete_item".to_string(), item.id)]);

    // The worker has removed the bag and reports back.
    let (deleted, event) = deletion::delete_object(&pool, obj.clone()).await.unwrap();
    assert_eq!(deleted.state, "D");
    assert_eq!(event.event_type, "deletion");
    assert_eq!(event.outcome, "Success");
    assert_eq!(event.outcome_detail, depositor.user.email);
    assert!(event.outcome_information.contains(&depositor.admin.email));
    assert_eq!(event.intellectual_object_id, obj.id);
    assert_eq!(event.generic_file_id, None);

    let stored = pool.get_intellectual_object(obj.id).await.unwrap().unwrap();
    assert_eq!(stored.state, "D");
    assert_eq!(
        pool.count_events_for_object(obj.id, EventType::Deletion)
            .await
            .unwrap(),
        1
    );

    // A second finish attempt is refused and records nothing.
    let err = deletion::delete_object(&pool, stored).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::DeletionPrecondition(PreconditionError::AlreadyDeleted)
    ));
    assert_eq!(
        pool.count_events_for_object(obj.id, EventType::Deletion)
            .await
            .unwrap(),
        1
    );
}

#[actix_rt::test]
async fn test_file_deletion_end_to_end() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    let gf = create_file(&pool, &obj).await;
    record_event(
        &pool,
        "ingestion",
        &obj,
        Some(gf.id),
        Utc::now() - Duration::hours(1),
    )
    .await;

    let request =
        deletion_workflow::initiate_file_deletion(&pool, TEST_BASE_URL, &depositor.user, &gf)
            .await
            .unwrap();
    let token = review_token(&pool, &depositor.admin).await;
    let (_, item) =
        deletion_workflow::approve(&pool, queue.as_ref(), request.id, &token, &depositor.admin)
            .await
            .unwrap();
    assert_eq!(item.generic_file_id, Some(gf.id));
    assert_eq!(item.size, gf.size);

    let (deleted, event) = deletion::delete_file(&pool, gf.clone()).await.unwrap();
    assert_eq!(deleted.state, "D");
    assert_eq!(event.generic_file_id, Some(gf.id));
    assert_eq!(event.intellectual_object_id, obj.id);

    // The object itself is untouched.
    let stored = pool.get_intellectual_object(obj.id).await.unwrap().unwrap();
    assert_eq!(stored.state, "A");
}

#[actix_rt::test]
async fn test_unapproved_delete_changes_nothing() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
        .await
        .unwrap();

    let err = deletion::delete_object(&pool, obj.clone()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::DeletionPrecondition(PreconditionError::MissingWorkItem)
    ));
    let stored = pool.get_intellectual_object(obj.id).await.unwrap().unwrap();
    assert_eq!(stored.state, "A");
    assert_eq!(
        pool.count_events_for_object(obj.id, EventType::Deletion)
            .await
            .unwrap(),
        0
    );
}

#[actix_rt::test]
async fn test_wrong_token_is_rejected() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let request =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
            .await
            .unwrap();

    let err = deletion_workflow::review(&pool, request.id, "not-the-token")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidToken));

    let err = deletion_workflow::approve(
        &pool,
        queue.as_ref(),
        request.id,
        "not-the-token",
        &depositor.admin,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidToken));
    assert!(queue.published().is_empty());

    let stored = pool.get_deletion_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), DeletionRequestStatus::Pending);
}

#[actix_rt::test]
async fn test_depositor_cannot_approve() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let request =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
            .await
            .unwrap();
    let token = review_token(&pool, &depositor.admin).await;

    let err =
        deletion_workflow::approve(&pool, queue.as_ref(), request.id, &token, &depositor.user)
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[actix_rt::test]
async fn test_cancelled_request_cannot_be_approved() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let request =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
            .await
            .unwrap();
    let token = review_token(&pool, &depositor.admin).await;

    let cancelled = deletion_workflow::cancel(&pool, request.id, &token, &depositor.admin)
        .await
        .unwrap();
    assert_eq!(cancelled.status(), DeletionRequestStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by_id, Some(depositor.admin.id));
    assert!(cancelled.cancelled_at.is_some());

    let err =
        deletion_workflow::approve(&pool, queue.as_ref(), request.id, &token, &depositor.admin)
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(queue.published().is_empty());
    assert!(
        pool.active_deletion_item_for_object(obj.id)
            .await
            .unwrap()
            .is_none()
    );

    let view = deletion_workflow::describe(&pool, cancelled).await.unwrap();
    assert_eq!(view.cancelled_by.as_deref(), Some(depositor.admin.email.as_str()));
    assert_eq!(view.intellectual_object_ids, vec![obj.id]);
}

#[actix_rt::test]
async fn test_cannot_request_deletion_at_another_institution() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let stranger = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let err =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &stranger.user, &obj)
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

/// A reviewer holding a copy read before the request was approved cannot
/// cancel it or approve it a second time.
#[actix_rt::test]
async fn test_stale_review_cannot_overwrite_approval() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let request =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
            .await
            .unwrap();
    let stale = pool.get_deletion_request(request.id).await.unwrap().unwrap();
    let token = review_token(&pool, &depositor.admin).await;
    let (_, item) =
        deletion_workflow::approve(&pool, queue.as_ref(), request.id, &token, &depositor.admin)
            .await
            .unwrap();

    let mut cancel = stale.clone();
    cancel.cancelled_by_id = Some(depositor.admin.id);
    cancel.cancelled_at = Some(Utc::now());
    let err = pool.save_cancelled_deletion(cancel).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let mut again = stale;
    again.confirmed_by_id = Some(depositor.admin.id);
    again.confirmed_at = Some(Utc::now());
    let mut extra = work_item_request(&obj, "Delete", "Requested", "Pending").into_model(Utc::now());
    extra.inst_approver = Some(depositor.admin.email.clone());
    let err = pool.save_approved_deletion(again, extra).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let stored = pool.get_deletion_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), DeletionRequestStatus::Approved);
    assert_eq!(stored.work_item_id, Some(item.id));
    assert_eq!(stored.cancelled_by_id, None);

    // The second approval's work item was rolled back with it.
    let pending = pool
        .work_items_pending_for_object(obj.institution_id, &obj.bag_name)
        .await
        .unwrap();
    assert_eq!(pending.iter().map(|i| i.id).collect::<Vec<_>>(), vec![item.id]);
    assert_eq!(queue.published(), vec![("delete_item".to_string(), item.id)]);
}

/// An approved object deletion covers the object's files, which the worker
/// removes before the object itself.
#[actix_rt::test]
async fn test_object_deletion_removes_files_first() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    let mut files = Vec::new();
    for _ in 0..2 {
        let gf = create_file(&pool, &obj).await;
        record_event(
            &pool,
            "ingestion",
            &obj,
            Some(gf.id),
            Utc::now() - Duration::hours(1),
        )
        .await;
        files.push(gf);
    }

    let request =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
            .await
            .unwrap();
    let token = review_token(&pool, &depositor.admin).await;
    let (_, item) =
        deletion_workflow::approve(&pool, queue.as_ref(), request.id, &token, &depositor.admin)
            .await
            .unwrap();
    assert_eq!(item.generic_file_id, None);

    let err = deletion::delete_object(&pool, obj.clone()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::DeletionPrecondition(PreconditionError::ActiveFilesExist)
    ));

    for gf in &files {
        let (deleted, event) = deletion::delete_file(&pool, gf.clone()).await.unwrap();
        assert_eq!(deleted.state, "D");
        assert_eq!(event.generic_file_id, Some(gf.id));
        assert_eq!(event.outcome_detail, depositor.user.email);
    }

    let (deleted, event) = deletion::delete_object(&pool, obj.clone()).await.unwrap();
    assert_eq!(deleted.state, "D");
    assert_eq!(event.generic_file_id, None);
    assert_eq!(
        pool.count_events_for_object(obj.id, EventType::Deletion)
            .await
            .unwrap(),
        3
    );
}

/// An approval for one object does not reach files of another object.
#[actix_rt::test]
async fn test_object_approval_does_not_cover_other_files() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;
    let other = create_ingested_object(&pool, &depositor.institution).await;
    let gf = create_file(&pool, &other).await;
    record_event(
        &pool,
        "ingestion",
        &other,
        Some(gf.id),
        Utc::now() - Duration::hours(1),
    )
    .await;

    let request =
        deletion_workflow::initiate_object_deletion(&pool, TEST_BASE_URL, &depositor.user, &obj)
            .await
            .unwrap();
    let token = review_token(&pool, &depositor.admin).await;
    deletion_workflow::approve(&pool, queue.as_ref(), request.id, &token, &depositor.admin)
        .await
        .unwrap();

    let err = deletion::delete_file(&pool, gf.clone()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::DeletionPrecondition(PreconditionError::MissingWorkItem)
    ));
    let stored = pool.get_generic_file(gf.id).await.unwrap().unwrap();
    assert_eq!(stored.state, "A");
}

/// When the deletion event cannot be stored, the object keeps its state.
#[actix_rt::test]
async fn test_failed_event_insert_rolls_back_object() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let ingest = record_event(
        &pool,
        "ingestion",
        &obj,
        None,
        Utc::now() - Duration::hours(1),
    )
    .await;

    let mut deleted = obj.clone();
    deleted.state = "D".to_string();
    deleted.updated_at = Utc::now();
    // Identifiers are unique, so this insert fails inside the transaction.
    let mut event = event_request("deletion", &obj, None).into_model(Utc::now());
    event.identifier = ingest.identifier.clone();

    let err = pool.save_object_deletion(deleted, event).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    let stored = pool.get_intellectual_object(obj.id).await.unwrap().unwrap();
    assert_eq!(stored.state, "A");
    assert_eq!(
        pool.count_events_for_object(obj.id, EventType::Deletion)
            .await
            .unwrap(),
        0
    );
}

/// Naming the same target more than once links it a single time.
#[actix_rt::test]
async fn test_repeated_targets_are_linked_once() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let gf = create_file(&pool, &obj).await;

    let request = pool
        .insert_deletion_request(
            unconfirmed_request(&depositor),
            &[obj.id, obj.id],
            &[gf.id, gf.id],
        )
        .await
        .unwrap();

    assert_eq!(
        pool.deletion_request_object_ids(request.id).await.unwrap(),
        vec![obj.id]
    );
    assert_eq!(
        pool.deletion_request_file_ids(request.id).await.unwrap(),
        vec![gf.id]
    );
}
