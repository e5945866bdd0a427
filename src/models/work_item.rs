//! Work item vocabulary and rules.
//!
//! Each action walks its own ordered list of stages. Requeueing sends an
//! item back to one of those stages and republishes it on the queue topic
//! that serves the stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::work_item;
use crate::error::AppError;
use crate::models::validation::{ValidationError, looks_like_email};

/// What a work item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WorkItemAction {
    Ingest,
    #[serde(rename = "Restore Object")]
    RestoreObject,
    #[serde(rename = "Restore File")]
    RestoreFile,
    #[serde(rename = "Glacier Restore")]
    GlacierRestore,
    Delete,
}

const INGEST_STAGES: &[Stage] = &[
    Stage::Receive,
    Stage::Validate,
    Stage::ReingestCheck,
    Stage::CopyToStaging,
    Stage::FormatIdentification,
    Stage::Store,
    Stage::StorageValidation,
    Stage::Record,
    Stage::Cleanup,
];

const RESTORE_OBJECT_STAGES: &[Stage] = &[
    Stage::Requested,
    Stage::Package,
    Stage::Restoring,
    Stage::AvailableInS3,
];

const RESTORE_FILE_STAGES: &[Stage] = &[Stage::Requested, Stage::Restoring, Stage::AvailableInS3];

const DELETE_STAGES: &[Stage] = &[Stage::Requested, Stage::Resolve];

impl WorkItemAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingest => "Ingest",
            Self::RestoreObject => "Restore Object",
            Self::RestoreFile => "Restore File",
            Self::GlacierRestore => "Glacier Restore",
            Self::Delete => "Delete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Ingest" => Some(Self::Ingest),
            "Restore Object" => Some(Self::RestoreObject),
            "Restore File" => Some(Self::RestoreFile),
            "Glacier Restore" => Some(Self::GlacierRestore),
            "Delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Stages this action passes through, in order.
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            Self::Ingest => INGEST_STAGES,
            Self::RestoreObject => RESTORE_OBJECT_STAGES,
            Self::RestoreFile | Self::GlacierRestore => RESTORE_FILE_STAGES,
            Self::Delete => DELETE_STAGES,
        }
    }

    /// Stage a brand new item of this action starts in.
    pub fn initial_stage(&self) -> Stage {
        self.stages()[0]
    }
}

impl std::fmt::Display for WorkItemAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing stage of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Stage {
    Receive,
    Validate,
    #[serde(rename = "Reingest Check")]
    ReingestCheck,
    #[serde(rename = "Copy To Staging")]
    CopyToStaging,
    #[serde(rename = "Format Identification")]
    FormatIdentification,
    Store,
    #[serde(rename = "Storage Validation")]
    StorageValidation,
    Record,
    Cleanup,
    Requested,
    Package,
    Restoring,
    #[serde(rename = "Available in S3")]
    AvailableInS3,
    Resolve,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receive => "Receive",
            Self::Validate => "Validate",
            Self::ReingestCheck => "Reingest Check",
            Self::CopyToStaging => "Copy To Staging",
            Self::FormatIdentification => "Format Identification",
            Self::Store => "Store",
            Self::StorageValidation => "Storage Validation",
            Self::Record => "Record",
            Self::Cleanup => "Cleanup",
            Self::Requested => "Requested",
            Self::Package => "Package",
            Self::Restoring => "Restoring",
            Self::AvailableInS3 => "Available in S3",
            Self::Resolve => "Resolve",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Receive" => Some(Self::Receive),
            "Validate" => Some(Self::Validate),
            "Reingest Check" => Some(Self::ReingestCheck),
            "Copy To Staging" => Some(Self::CopyToStaging),
            "Format Identification" => Some(Self::FormatIdentification),
            "Store" => Some(Self::Store),
            "Storage Validation" => Some(Self::StorageValidation),
            "Record" => Some(Self::Record),
            "Cleanup" => Some(Self::Cleanup),
            "Requested" => Some(Self::Requested),
            "Package" => Some(Self::Package),
            "Restoring" => Some(Self::Restoring),
            "Available in S3" => Some(Self::AvailableInS3),
            "Resolve" => Some(Self::Resolve),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Work item status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WorkItemStatus {
    Pending,
    Started,
    Success,
    Failed,
    Cancelled,
    Suspended,
}

impl WorkItemStatus {
    /// Statuses after which no worker will touch the item again.
    pub const COMPLETED: [WorkItemStatus; 4] = [
        Self::Success,
        Self::Failed,
        Self::Cancelled,
        Self::Suspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Started => "Started",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Suspended => "Suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Started" => Some(Self::Started),
            "Success" => Some(Self::Success),
            "Failed" => Some(Self::Failed),
            "Cancelled" => Some(Self::Cancelled),
            "Suspended" => Some(Self::Suspended),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        Self::COMPLETED.contains(self)
    }

    /// String values of [`Self::COMPLETED`], for queries.
    pub fn completed_strs() -> Vec<&'static str> {
        Self::COMPLETED.iter().map(|s| s.as_str()).collect()
    }
}

impl std::fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Queue topic that serves `stage` of `action`.
///
/// Fails with [`AppError::InvalidRequeue`] when the stage does not belong to
/// the action or is terminal.
pub fn topic_for(action: WorkItemAction, stage: Stage) -> Result<&'static str, AppError> {
    let topic = match (action, stage) {
        (WorkItemAction::Ingest, Stage::Receive) => Some("ingest01_prefetch"),
        (WorkItemAction::Ingest, Stage::Validate) => Some("ingest02_bag_validation"),
        (WorkItemAction::Ingest, Stage::ReingestCheck) => Some("ingest03_reingest_check"),
        (WorkItemAction::Ingest, Stage::CopyToStaging) => Some("ingest04_staging"),
        (WorkItemAction::Ingest, Stage::FormatIdentification) => {
            Some("ingest05_format_identification")
        }
        (WorkItemAction::Ingest, Stage::Store) => Some("ingest06_storage"),
        (WorkItemAction::Ingest, Stage::StorageValidation) => Some("ingest07_storage_validation"),
        (WorkItemAction::Ingest, Stage::Record) => Some("ingest08_record"),
        (WorkItemAction::Ingest, Stage::Cleanup) => Some("ingest09_cleanup"),
        (WorkItemAction::RestoreObject, Stage::Requested | Stage::Package | Stage::Restoring) => {
            Some("restore_object")
        }
        (WorkItemAction::RestoreFile, Stage::Requested | Stage::Restoring) => Some("restore_file"),
        (WorkItemAction::GlacierRestore, Stage::Requested | Stage::Restoring) => {
            Some("restore_glacier")
        }
        (WorkItemAction::Delete, Stage::Requested | Stage::Resolve) => Some("delete_item"),
        _ => None,
    };
    topic.ok_or_else(|| AppError::InvalidRequeue {
        action: action.as_str().to_string(),
        stage: stage.as_str().to_string(),
    })
}

impl work_item::Model {
    pub fn action_kind(&self) -> Option<WorkItemAction> {
        WorkItemAction::parse(&self.action)
    }

    pub fn stage_kind(&self) -> Option<Stage> {
        Stage::parse(&self.stage)
    }

    /// True once the item reached a status no worker will pick up again.
    pub fn has_completed(&self) -> bool {
        WorkItemStatus::parse(&self.status)
            .map(|s| s.is_completed())
            .unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(self.name.trim().is_empty(), "name", "Name is required.");
        errors.check(
            !(32..=40).contains(&self.etag.len()),
            "etag",
            "ETag is required (32-40 bytes).",
        );
        errors.check(self.bucket.trim().is_empty(), "bucket", "Bucket is required.");
        errors.check(
            !looks_like_email(&self.user),
            "user",
            "User must be a valid email address.",
        );
        errors.check(
            self.institution_id <= 0,
            "institution_id",
            "InstitutionID is required.",
        );
        errors.check(self.note.trim().is_empty(), "note", "Note cannot be empty.");
        errors.check(
            self.outcome.len() > 1000,
            "outcome",
            "Outcome must not exceed 1000 bytes.",
        );
        errors.check(
            WorkItemStatus::parse(&self.status).is_none(),
            "status",
            "Status is missing or invalid.",
        );

        match self.action_kind() {
            None => errors.add("action", "Action is missing or invalid."),
            Some(action) => {
                let legal = self
                    .stage_kind()
                    .map(|stage| action.stages().contains(&stage))
                    .unwrap_or(false);
                errors.check(!legal, "stage", "Stage is missing or invalid.");
            }
        }
        errors.check(self.size < 0, "size", "Size cannot be negative.");

        errors.into_result()
    }

    /// Rejects updates that would change what the item is about.
    pub fn validate_changes(&self, updated: &work_item::Model) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(updated.id != self.id, "id", "ID cannot change.");
        errors.check(
            updated.institution_id != self.institution_id,
            "institution_id",
            "Institution ID cannot change.",
        );
        errors.check(
            updated.intellectual_object_id != self.intellectual_object_id,
            "intellectual_object_id",
            "Intellectual object ID cannot change.",
        );
        errors.check(
            updated.generic_file_id != self.generic_file_id,
            "generic_file_id",
            "Generic file ID cannot change.",
        );
        errors.check(updated.name != self.name, "name", "Name cannot change.");
        errors.check(updated.etag != self.etag, "etag", "ETag cannot change.");
        errors.check(updated.action != self.action, "action", "Action cannot change.");
        errors.into_result()
    }

    /// Stages an operator may requeue this item to: the action's stages up
    /// to and including the current one, skipping terminal stages.
    pub fn requeue_options(&self) -> Vec<Stage> {
        let (Some(action), Some(current)) = (self.action_kind(), self.stage_kind()) else {
            return Vec::new();
        };
        let stages = action.stages();
        let Some(pos) = stages.iter().position(|s| *s == current) else {
            return Vec::new();
        };
        stages[..=pos]
            .iter()
            .copied()
            .filter(|stage| topic_for(action, *stage).is_ok())
            .collect()
    }
}

/// Body for creating a work item.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateWorkItemRequest {
    pub name: String,
    pub etag: String,
    pub institution_id: i32,
    #[serde(default)]
    pub intellectual_object_id: Option<i32>,
    #[serde(default)]
    pub generic_file_id: Option<i32>,
    pub bucket: String,
    pub user: String,
    pub note: String,
    pub action: String,
    pub stage: String,
    pub status: String,
    pub outcome: String,
    pub bag_date: DateTime<Utc>,
    #[serde(default)]
    pub size: i64,
}

impl CreateWorkItemRequest {
    /// Unsaved model (id 0) stamped with `now`.
    pub fn into_model(self, now: DateTime<Utc>) -> work_item::Model {
        work_item::Model {
            id: 0,
            name: self.name,
            etag: self.etag,
            institution_id: self.institution_id,
            intellectual_object_id: self.intellectual_object_id,
            generic_file_id: self.generic_file_id,
            bucket: self.bucket,
            user: self.user,
            note: self.note,
            action: self.action,
            stage: self.stage,
            status: self.status,
            outcome: self.outcome,
            bag_date: self.bag_date,
            date_processed: now,
            retry: true,
            node: None,
            pid: 0,
            needs_admin_review: false,
            queued_at: None,
            size: self.size,
            stage_started_at: None,
            aptrust_approver: None,
            inst_approver: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body for requeueing a work item.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RequeueRequest {
    pub stage: Stage,
}

/// Query for in-flight work items on a bag.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PendingWorkItemsQuery {
    pub institution_id: i32,
    pub bag_name: String,
}

/// Stages offered for requeueing a work item.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequeueOptionsResponse {
    pub work_item_id: i32,
    pub action: String,
    pub current_stage: String,
    pub stages: Vec<Stage>,
}
