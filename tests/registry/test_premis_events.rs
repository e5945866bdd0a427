//! PREMIS events are insert-only.

use chrono::Utc;

use preservation_registry::error::AppError;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_saved_event_cannot_be_changed() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;
    let event = record_event(&pool, "fixity check", &obj, None, Utc::now()).await;
    assert!(event.id > 0);

    let mut changed = event.clone();
    changed.outcome = "Failure".to_string();
    changed.outcome_detail = "tampered".to_string();
    let err = pool.save_premis_event(changed).await.unwrap_err();
    assert!(matches!(err, AppError::NotSupported(_)));

    let stored = pool.get_premis_event(event.id).await.unwrap().unwrap();
    assert_eq!(stored.outcome, "Success");
    assert_eq!(stored.outcome_detail, event.outcome_detail);
}

#[actix_rt::test]
async fn test_invalid_event_is_rejected() {
    let pool = create_test_pool().await;
    let depositor = create_depositor(&pool).await;
    let obj = create_object(&pool, &depositor.institution).await;

    let mut request = event_request("transmogrification", &obj, None);
    request.agent = String::new();
    let err = pool
        .save_premis_event(request.into_model(Utc::now()))
        .await
        .unwrap_err();
    match err {
        AppError::Validation(errors) => {
            assert!(errors.get("event_type").is_some());
            assert!(errors.get("agent").is_some());
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}
