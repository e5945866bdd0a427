//! Alert vocabulary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    DeletionRequested,
    DeletionConfirmed,
    DeletionCancelled,
    RestorationCompleted,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeletionRequested => "Deletion Requested",
            Self::DeletionConfirmed => "Deletion Confirmed",
            Self::DeletionCancelled => "Deletion Cancelled",
            Self::RestorationCompleted => "Restoration Completed",
        }
    }
}

/// Alert as shown to one recipient.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertView {
    pub id: i32,
    pub alert_type: String,
    pub subject: String,
    pub content: String,
    pub deletion_request_id: Option<i32>,
    pub work_item_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::alert::Model> for AlertView {
    fn from(m: crate::entity::alert::Model) -> Self {
        Self {
            id: m.id,
            alert_type: m.alert_type,
            subject: m.subject,
            content: m.content,
            deletion_request_id: m.deletion_request_id,
            work_item_id: m.work_item_id,
            created_at: m.created_at,
        }
    }
}

pub const SPOT_TEST_SUBJECT: &str = "Restoration Spot Test Completed";

/// Location of a restored bag, taken from a finished restore item's note
/// (`"... restored to <url>."`).
pub fn restoration_url(note: &str) -> Option<&str> {
    let (_, url) = note.split_once(" restored to ")?;
    let url = url.strip_suffix('.').unwrap_or(url).trim();
    (!url.is_empty()).then_some(url)
}

/// Body of the alert sent when a restoration spot test finishes.
pub fn spot_test_content(identifier: &str, url: &str, frequency_days: i64) -> String {
    format!(
        "A restoration spot test of {} has completed. The restored bag is available at {}. \
         Please check that it is complete and readable. Spot tests run every {} days.",
        identifier, url, frequency_days
    )
}
