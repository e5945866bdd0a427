//! HTTP surface: authentication, routing and status codes.

use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use preservation_registry::services::api_key;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_health_is_public() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, Arc::new(RecordingQueue::default())).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_missing_credentials_returns_401() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, Arc::new(RecordingQueue::default())).await;
    let inst = create_institution(&pool, &format!("{}.edu", unique("inst"))).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/institutions/{}", inst.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/institutions/{}", inst.id))
        .insert_header(("X-Admin-Key", "wrong-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_user_key_authenticates() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, Arc::new(RecordingQueue::default())).await;
    let depositor = create_depositor(&pool).await;
    let key = api_key::issue_key(&pool, &depositor.user).await.unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/institutions/{}", depositor.institution.id))
        .insert_header(("X-Pharos-API-User", depositor.user.email.as_str()))
        .insert_header(("X-Pharos-API-Key", key.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Another institution is off limits.
    let other = create_institution(&pool, &format!("{}.edu", unique("other"))).await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/institutions/{}", other.id))
        .insert_header(("X-Pharos-API-User", depositor.user.email.as_str()))
        .insert_header(("X-Pharos-API-Key", key.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // A key for someone else's address does not work.
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/institutions/{}", depositor.institution.id))
        .insert_header(("X-Pharos-API-User", depositor.admin.email.as_str()))
        .insert_header(("X-Pharos-API-Key", key.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_event_update_returns_405() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, Arc::new(RecordingQueue::default())).await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let event = record_event(&pool, "ingestion", &obj, None, chrono::Utc::now()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/events/{}", event.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "outcome": "Failure" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_SUPPORTED");
}

#[actix_rt::test]
async fn test_institution_delete_and_undelete_over_http() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, Arc::new(RecordingQueue::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/institutions")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({
            "name": "Example College",
            "identifier": "example.edu",
            "institution_type": "MemberInstitution"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["receiving_bucket"], "aptrust.receiving.example.edu");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/institutions/{}", id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = test::read_body_json(resp).await;
    assert_eq!(deleted["state"], "D");
    assert!(!deleted["deactivated_at"].is_null());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/institutions/{}/undelete", id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let restored: Value = test::read_body_json(resp).await;
    assert_eq!(restored["state"], "A");
    assert!(restored["deactivated_at"].is_null());
}

#[actix_rt::test]
async fn test_pending_route_is_not_an_id() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, Arc::new(RecordingQueue::default())).await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let item = save_work_item(&pool, &obj, "Ingest", "Receive", "Pending").await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/work_items/pending?institution_id={}&bag_name={}",
            obj.institution_id,
            urlencoding::encode(&obj.bag_name)
        ))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Value = test::read_body_json(resp).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], item.id);
}

#[actix_rt::test]
async fn test_requeue_over_http() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let app = create_test_app(&pool, queue.clone()).await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let item = save_work_item(&pool, &obj, "Ingest", "Store", "Failed").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/work_items/{}/requeue_options", item.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let options: Value = test::read_body_json(resp).await;
    assert_eq!(options["stages"].as_array().unwrap().len(), 6);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/work_items/{}/requeue", item.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "stage": "Package" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(queue.published().is_empty());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/work_items/{}/requeue", item.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "stage": "Receive" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let requeued: Value = test::read_body_json(resp).await;
    assert_eq!(requeued["stage"], "Receive");
    assert_eq!(requeued["note"], "Requeued for Receive");
    assert_eq!(
        queue.published(),
        vec![("ingest01_prefetch".to_string(), item.id)]
    );
}

#[actix_rt::test]
async fn test_alerts_need_a_user() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, Arc::new(RecordingQueue::default())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/alerts")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
