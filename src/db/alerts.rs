//! Database queries for alerts.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, EntityTrait, IntoActiveModel, ModelTrait,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{error, info, warn};

use crate::entity::alert::{self, ActiveModel, Entity as Alert};
use crate::entity::{alert_user, user, work_item};
use crate::error::{AppError, AppResult};
use crate::models::alert::{restoration_url, spot_test_content};
use crate::models::{AlertType, SPOT_TEST_SUBJECT, WorkItemAction, WorkItemStatus};

use super::DbPool;

impl DbPool {
    /// Store an alert and address it to each recipient.
    pub async fn insert_alert(
        &self,
        alert: alert::Model,
        recipient_ids: &[i32],
    ) -> AppResult<alert::Model> {
        let txn = self.connection().begin().await?;

        let mut active: ActiveModel = alert.into_active_model().reset_all();
        active.id = NotSet;
        let alert = active
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert alert: {}", e)))?;

        if !recipient_ids.is_empty() {
            let rows = recipient_ids.iter().map(|user_id| alert_user::ActiveModel {
                alert_id: Set(alert.id),
                user_id: Set(*user_id),
                read_at: Set(None),
            });
            alert_user::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to address alert: {}", e)))?;
        }

        txn.commit().await?;
        Ok(alert)
    }

    /// Alerts addressed to a user, newest first.
    pub async fn alerts_for_user(&self, user: &user::Model) -> AppResult<Vec<alert::Model>> {
        user.find_related(Alert)
            .order_by_desc(alert::Column::CreatedAt)
            .order_by_desc(alert::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get alerts: {}", e)))
    }

    /// Tell the institution's users that a restoration spot test finished.
    ///
    /// Only a successful Restore Object item recorded as an institution's
    /// latest spot test produces an alert. Failures are logged, not returned,
    /// so they never undo the work item update.
    pub async fn alert_on_successful_spot_test(
        &self,
        item: &work_item::Model,
    ) -> Option<alert::Model> {
        if item.action_kind() != Some(WorkItemAction::RestoreObject)
            || WorkItemStatus::parse(&item.status) != Some(WorkItemStatus::Success)
        {
            return None;
        }
        match self.create_spot_test_alert(item).await {
            Ok(alert) => alert,
            Err(e) => {
                error!(work_item_id = item.id, "Failed to create spot test alert: {}", e);
                None
            }
        }
    }

    async fn create_spot_test_alert(
        &self,
        item: &work_item::Model,
    ) -> AppResult<Option<alert::Model>> {
        let Some(inst) = self.spot_test_institution(item.id).await? else {
            return Ok(None);
        };
        let Some(object_id) = item.intellectual_object_id else {
            return Ok(None);
        };
        let Some(obj) = self.get_intellectual_object(object_id).await? else {
            return Ok(None);
        };
        let Some(url) = restoration_url(&item.note) else {
            warn!(
                work_item_id = item.id,
                note = %item.note,
                "Spot test note does not name the restored bag"
            );
            return Ok(None);
        };

        let users = self.list_active_users(item.institution_id).await?;
        let recipients: Vec<i32> = users.iter().map(|u| u.id).collect();
        let alert = self
            .insert_alert(
                alert::Model {
                    id: 0,
                    institution_id: inst.id,
                    alert_type: AlertType::RestorationCompleted.as_str().to_string(),
                    subject: SPOT_TEST_SUBJECT.to_string(),
                    content: spot_test_content(&obj.identifier, url, inst.spot_restore_frequency),
                    deletion_request_id: None,
                    work_item_id: Some(item.id),
                    created_at: Utc::now(),
                },
                &recipients,
            )
            .await?;
        info!(
            alert_id = alert.id,
            work_item_id = item.id,
            recipients = recipients.len(),
            "Spot test alert created"
        );
        Ok(Some(alert))
    }
}
