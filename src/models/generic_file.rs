//! Generic file rules.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entity::generic_file;
use crate::models::common::{RecordState, StorageOption};
use crate::models::validation::ValidationError;

impl generic_file::Model {
    pub fn is_active(&self) -> bool {
        RecordState::parse(&self.state) == Some(RecordState::Active)
    }

    pub fn is_glacier_only(&self) -> bool {
        StorageOption::parse(&self.storage_option)
            .map(|opt| opt.is_glacier_only())
            .unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(
            self.file_format.trim().is_empty(),
            "file_format",
            "FileFormat is required.",
        );
        errors.check(
            self.identifier.trim().is_empty(),
            "identifier",
            "Identifier is required.",
        );
        errors.check(
            RecordState::parse(&self.state).is_none(),
            "state",
            "State is missing or invalid.",
        );
        errors.check(self.size < 0, "size", "Size cannot be negative.");
        errors.check(
            self.institution_id <= 0,
            "institution_id",
            "InstitutionID is required.",
        );
        errors.check(
            self.intellectual_object_id <= 0,
            "intellectual_object_id",
            "IntellectualObjectID is required.",
        );
        errors.check(
            StorageOption::parse(&self.storage_option).is_none(),
            "storage_option",
            "StorageOption is missing or invalid.",
        );
        errors.check(
            uuid::Uuid::parse_str(&self.uuid).is_err(),
            "uuid",
            "UUID is missing or invalid.",
        );
        errors.into_result()
    }
}

/// Body for registering a preserved file.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateGenericFileRequest {
    pub file_format: String,
    pub size: i64,
    pub identifier: String,
    pub intellectual_object_id: i32,
    pub institution_id: i32,
    pub storage_option: StorageOption,
    /// Storage key; a new one is generated when omitted.
    #[serde(default)]
    pub uuid: Option<String>,
}

impl CreateGenericFileRequest {
    pub fn into_model(self, now: DateTime<Utc>) -> generic_file::Model {
        generic_file::Model {
            id: 0,
            file_format: self.file_format,
            size: self.size,
            identifier: self.identifier,
            intellectual_object_id: self.intellectual_object_id,
            institution_id: self.institution_id,
            state: RecordState::Active.as_str().to_string(),
            storage_option: self.storage_option.as_str().to_string(),
            uuid: self.uuid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            last_fixity_check: None,
            created_at: now,
            updated_at: now,
        }
    }
}
