//! Institution soft delete.

use chrono::Utc;

use preservation_registry::models::RecordState;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_soft_delete_and_undelete() {
    let pool = create_test_pool().await;
    let inst = create_institution(&pool, &format!("{}.edu", unique("inst"))).await;
    assert!(inst.is_active());
    assert_eq!(inst.deactivated_at, None);

    let lifecycle = inst.lifecycle().soft_delete(Utc::now());
    let deleted = pool.set_institution_lifecycle(inst, lifecycle).await.unwrap();
    assert_eq!(deleted.state, RecordState::Deleted.as_str());
    assert!(deleted.deactivated_at.is_some());
    assert!(!deleted.is_active());
    assert!(deleted.validate().is_ok());

    // The row is kept.
    let stored = pool.get_institution(deleted.id).await.unwrap().unwrap();
    assert_eq!(stored.state, "D");
    assert!(stored.deactivated_at.is_some());

    let lifecycle = stored.lifecycle().undelete();
    let restored = pool.set_institution_lifecycle(stored, lifecycle).await.unwrap();
    assert_eq!(restored.state, "A");
    assert_eq!(restored.deactivated_at, None);
    assert!(restored.validate().is_ok());
}
