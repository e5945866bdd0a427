//! Restoration spot tests and the alert raised when one succeeds.

use std::sync::Arc;

use chrono::Utc;

use preservation_registry::db::DbPool;
use preservation_registry::entity::{institution, work_item};
use preservation_registry::error::AppError;
use preservation_registry::models::{
    AlertType, CreateInstitutionRequest, CreateUserRequest, InstitutionType, Role,
    SPOT_TEST_SUBJECT,
};
use preservation_registry::services::work_items;

use super::test_helpers::*;

const RESTORED_BAG: &str = "https://s3.example.org/aptrust.restore.test/bag.tar";

async fn create_spot_test_institution(pool: &DbPool) -> institution::Model {
    let identifier = format!("{}.edu", unique("spot"));
    pool.insert_institution(
        CreateInstitutionRequest {
            name: format!("Institution {}", identifier),
            identifier,
            institution_type: InstitutionType::MemberInstitution,
            member_institution_id: None,
            spot_restore_frequency: 90,
        }
        .into_model(Utc::now()),
    )
    .await
    .unwrap()
}

async fn finish_restoration(pool: &DbPool, item: work_item::Model) -> work_item::Model {
    let mut item = item;
    item.stage = "Available in S3".to_string();
    item.status = "Success".to_string();
    item.note = format!("Object restored to {}.", RESTORED_BAG);
    pool.save_work_item(item).await.unwrap()
}

#[actix_rt::test]
async fn test_successful_spot_test_alerts_active_users() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let inst = create_spot_test_institution(&pool).await;
    let admin = create_user(&pool, &inst, Role::InstitutionalAdmin, "Admin").await;
    let user = create_user(&pool, &inst, Role::InstitutionalUser, "User").await;
    let mut former = CreateUserRequest {
        name: "Former".to_string(),
        email: format!("former@{}", inst.identifier),
        role: Role::InstitutionalUser,
        institution_id: inst.id,
    }
    .into_model(Utc::now());
    former.deactivated_at = Some(Utc::now());
    let former = pool.insert_user(former).await.unwrap();
    let obj = create_ingested_object(&pool, &inst).await;

    let item = work_items::initiate_spot_test(&pool, queue.as_ref(), &obj, &admin)
        .await
        .unwrap();
    assert_eq!(item.action, "Restore Object");
    let stored = pool.get_institution(inst.id).await.unwrap().unwrap();
    assert_eq!(stored.last_spot_restore_work_item_id, Some(item.id));

    // Progress without a status change does not alert.
    let mut running = item.clone();
    running.stage = "Restoring".to_string();
    pool.save_work_item(running).await.unwrap();
    assert!(pool.alerts_for_user(&user).await.unwrap().is_empty());

    finish_restoration(&pool, item.clone()).await;

    let alerts = pool.alerts_for_user(&user).await.unwrap();
    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.alert_type, AlertType::RestorationCompleted.as_str());
    assert_eq!(alert.subject, SPOT_TEST_SUBJECT);
    assert_eq!(alert.institution_id, inst.id);
    assert_eq!(alert.work_item_id, Some(item.id));
    assert!(alert.content.contains(&obj.identifier));
    assert!(alert.content.contains(RESTORED_BAG));
    assert!(alert.content.contains("90 days"));

    assert_eq!(pool.alerts_for_user(&admin).await.unwrap().len(), 1);
    assert!(pool.alerts_for_user(&former).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_ordinary_restoration_does_not_alert() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let inst = create_spot_test_institution(&pool).await;
    let user = create_user(&pool, &inst, Role::InstitutionalUser, "User").await;
    let obj = create_ingested_object(&pool, &inst).await;

    let item = work_items::initiate_object_restoration(&pool, queue.as_ref(), &obj, &user)
        .await
        .unwrap();
    finish_restoration(&pool, item).await;

    assert!(pool.alerts_for_user(&user).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_spot_test_requires_frequency() {
    let pool = create_test_pool().await;
    let queue = Arc::new(RecordingQueue::default());
    let depositor = create_depositor(&pool).await;
    let obj = create_ingested_object(&pool, &depositor.institution).await;

    let err = work_items::initiate_spot_test(&pool, queue.as_ref(), &obj, &depositor.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(queue.published().is_empty());

    let stored = pool.get_institution(depositor.institution.id).await.unwrap().unwrap();
    assert_eq!(stored.last_spot_restore_work_item_id, None);
}
