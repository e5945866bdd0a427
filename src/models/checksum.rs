//! Checksum rules.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entity::checksum;
use crate::models::validation::ValidationError;

pub const ALGORITHMS: [&str; 4] = ["md5", "sha1", "sha256", "sha512"];

impl checksum::Model {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(
            !ALGORITHMS.contains(&self.algorithm.as_str()),
            "algorithm",
            "Algorithm is missing or invalid.",
        );
        errors.check(self.digest.trim().is_empty(), "digest", "Digest is required.");
        errors.check(
            self.generic_file_id <= 0,
            "generic_file_id",
            "GenericFileID is required.",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateChecksumRequest {
    pub algorithm: String,
    pub date_time: DateTime<Utc>,
    pub digest: String,
    pub generic_file_id: i32,
}

impl CreateChecksumRequest {
    pub fn into_model(self, now: DateTime<Utc>) -> checksum::Model {
        checksum::Model {
            id: 0,
            algorithm: self.algorithm,
            date_time: self.date_time,
            digest: self.digest,
            generic_file_id: self.generic_file_id,
            created_at: now,
            updated_at: now,
        }
    }
}
