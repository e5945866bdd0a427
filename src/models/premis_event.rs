//! PREMIS event vocabulary and validation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entity::premis_event;
use crate::models::validation::ValidationError;

/// PREMIS event types recorded by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    AccessAssignment,
    Accession,
    Capture,
    Creation,
    Deletion,
    DigestCalculation,
    FixityCheck,
    FormatIdentification,
    IdentifierAssignment,
    Ingestion,
    MetadataModification,
    Replication,
    Validation,
    VirusCheck,
}

impl EventType {
    pub const ALL: [EventType; 14] = [
        Self::AccessAssignment,
        Self::Accession,
        Self::Capture,
        Self::Creation,
        Self::Deletion,
        Self::DigestCalculation,
        Self::FixityCheck,
        Self::FormatIdentification,
        Self::IdentifierAssignment,
        Self::Ingestion,
        Self::MetadataModification,
        Self::Replication,
        Self::Validation,
        Self::VirusCheck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessAssignment => "access assignment",
            Self::Accession => "accession",
            Self::Capture => "capture",
            Self::Creation => "creation",
            Self::Deletion => "deletion",
            Self::DigestCalculation => "digest calculation",
            Self::FixityCheck => "fixity check",
            Self::FormatIdentification => "format identification",
            Self::IdentifierAssignment => "identifier assignment",
            Self::Ingestion => "ingestion",
            Self::MetadataModification => "metadata modification",
            Self::Replication => "replication",
            Self::Validation => "validation",
            Self::VirusCheck => "virus check",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Success,
    Failure,
}

impl EventOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Success" => Some(Self::Success),
            "Failure" => Some(Self::Failure),
            _ => None,
        }
    }
}

impl premis_event::Model {
    /// Reports every missing or malformed field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(
            uuid::Uuid::parse_str(&self.identifier).is_err(),
            "identifier",
            "Event identifier should be a UUID",
        );
        errors.check(
            EventType::parse(&self.event_type).is_none(),
            "event_type",
            "Event requires a valid EventType",
        );
        errors.check(
            self.date_time.timestamp() <= 0,
            "date_time",
            "Event requires a valid DateTime",
        );
        errors.check(self.detail.trim().is_empty(), "detail", "Event requires Detail");
        errors.check(
            EventOutcome::parse(&self.outcome).is_none(),
            "outcome",
            "Event requires a valid Outcome value",
        );
        errors.check(
            self.outcome_detail.trim().is_empty(),
            "outcome_detail",
            "Event requires OutcomeDetail",
        );
        errors.check(
            self.outcome_information.trim().is_empty(),
            "outcome_information",
            "Event requires OutcomeInformation",
        );
        errors.check(self.object.trim().is_empty(), "object", "Event requires Object");
        errors.check(self.agent.trim().is_empty(), "agent", "Event requires Agent");
        errors.check(
            self.intellectual_object_id <= 0,
            "intellectual_object_id",
            "Event requires IntellectualObjectID",
        );
        errors.check(
            self.institution_id <= 0,
            "institution_id",
            "Event requires InstitutionID",
        );
        errors.into_result()
    }
}

/// Body for recording an event.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePremisEventRequest {
    /// Defaults to a fresh UUID when omitted.
    #[serde(default)]
    pub identifier: Option<String>,
    pub event_type: String,
    pub date_time: DateTime<Utc>,
    pub detail: String,
    pub outcome: String,
    pub outcome_detail: String,
    pub outcome_information: String,
    pub object: String,
    pub agent: String,
    pub intellectual_object_id: i32,
    #[serde(default)]
    pub generic_file_id: Option<i32>,
    pub institution_id: i32,
}

impl CreatePremisEventRequest {
    pub fn into_model(self, now: DateTime<Utc>) -> premis_event::Model {
        premis_event::Model {
            id: 0,
            identifier: self
                .identifier
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            event_type: self.event_type,
            date_time: self.date_time,
            detail: self.detail,
            outcome: self.outcome,
            outcome_detail: self.outcome_detail,
            outcome_information: self.outcome_information,
            object: self.object,
            agent: self.agent,
            intellectual_object_id: self.intellectual_object_id,
            generic_file_id: self.generic_file_id,
            institution_id: self.institution_id,
            created_at: now,
            updated_at: now,
        }
    }
}
