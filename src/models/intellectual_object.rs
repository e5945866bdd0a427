//! Intellectual object rules.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entity::intellectual_object;
use crate::models::common::{Access, RecordState, StorageOption};
use crate::models::validation::ValidationError;

impl intellectual_object::Model {
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
        errors.check(self.title.trim().is_empty(), "title", "Title is required.");
        errors.check(
            self.identifier.trim().is_empty(),
            "identifier",
            "Identifier is required.",
        );
        errors.check(self.bag_name.trim().is_empty(), "bag_name", "BagName is required.");
        errors.check(
            RecordState::parse(&self.state).is_none(),
            "state",
            "State is missing or invalid.",
        );
        errors.check(
            Access::parse(&self.access).is_none(),
            "access",
            "Access is missing or invalid.",
        );
        errors.check(
            self.institution_id <= 0,
            "institution_id",
            "InstitutionID is required.",
        );
        errors.check(
            StorageOption::parse(&self.storage_option).is_none(),
            "storage_option",
            "StorageOption is missing or invalid.",
        );
        errors.check(
            self.bagit_profile_identifier.trim().is_empty(),
            "bagit_profile_identifier",
            "BagItProfileIdentifier is required.",
        );
        errors.into_result()
    }
}

/// Body for registering an ingested object.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIntellectualObjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub identifier: String,
    #[serde(default)]
    pub alt_identifier: Option<String>,
    pub access: Access,
    pub bag_name: String,
    pub institution_id: i32,
    #[serde(default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub bag_group_identifier: Option<String>,
    pub storage_option: StorageOption,
    pub bagit_profile_identifier: String,
    #[serde(default)]
    pub source_organization: Option<String>,
    #[serde(default)]
    pub internal_sender_identifier: Option<String>,
    #[serde(default)]
    pub internal_sender_description: Option<String>,
}

impl CreateIntellectualObjectRequest {
    pub fn into_model(self, now: DateTime<Utc>) -> intellectual_object::Model {
        intellectual_object::Model {
            id: 0,
            title: self.title,
            description: self.description,
            identifier: self.identifier,
            alt_identifier: self.alt_identifier,
            access: self.access.as_str().to_string(),
            bag_name: self.bag_name,
            institution_id: self.institution_id,
            state: RecordState::Active.as_str().to_string(),
            etag: self.etag,
            bag_group_identifier: self.bag_group_identifier,
            storage_option: self.storage_option.as_str().to_string(),
            bagit_profile_identifier: self.bagit_profile_identifier,
            source_organization: self.source_organization,
            internal_sender_identifier: self.internal_sender_identifier,
            internal_sender_description: self.internal_sender_description,
            created_at: now,
            updated_at: now,
        }
    }
}
