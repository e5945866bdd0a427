//! Institution rules and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::institution;
use crate::models::common::RecordState;
use crate::models::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum InstitutionType {
    MemberInstitution,
    SubscriptionInstitution,
}

impl InstitutionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MemberInstitution => "MemberInstitution",
            Self::SubscriptionInstitution => "SubscriptionInstitution",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MemberInstitution" => Some(Self::MemberInstitution),
            "SubscriptionInstitution" => Some(Self::SubscriptionInstitution),
            _ => None,
        }
    }
}

/// Active/deleted state together with the deactivation time.
///
/// Holding both in one value keeps `deactivated_at` set exactly when the
/// institution is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Deleted { at: DateTime<Utc> },
}

impl Lifecycle {
    /// Reads the lifecycle from stored columns. A `D` row without a
    /// timestamp falls back to its last update time.
    pub fn of(model: &institution::Model) -> Self {
        match RecordState::parse(&model.state) {
            Some(RecordState::Deleted) => Self::Deleted {
                at: model.deactivated_at.unwrap_or(model.updated_at),
            },
            _ => Self::Active,
        }
    }

    pub fn soft_delete(self, now: DateTime<Utc>) -> Self {
        Self::Deleted { at: now }
    }

    pub fn undelete(self) -> Self {
        Self::Active
    }

    pub fn state(&self) -> RecordState {
        match self {
            Self::Active => RecordState::Active,
            Self::Deleted { .. } => RecordState::Deleted,
        }
    }

    pub fn deactivated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted { at } => Some(*at),
        }
    }
}

pub fn receiving_bucket_for(identifier: &str) -> String {
    format!("aptrust.receiving.{}", identifier)
}

pub fn restore_bucket_for(identifier: &str) -> String {
    format!("aptrust.restore.{}", identifier)
}

impl institution::Model {
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::of(self)
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle() == Lifecycle::Active
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(
            !(5..=200).contains(&self.name.trim().len()),
            "name",
            "Name must contain 5-200 characters.",
        );
        errors.check(
            !self.identifier.contains('.')
                || self.identifier.starts_with('.')
                || self.identifier.ends_with('.')
                || self.identifier.contains(char::is_whitespace),
            "identifier",
            "Identifier must be a domain name.",
        );
        match RecordState::parse(&self.state) {
            None => errors.add("state", "State must be 'A' or 'D'."),
            Some(state) => errors.check(
                (state == RecordState::Deleted) != self.deactivated_at.is_some(),
                "deactivated_at",
                "Deactivation time must be set exactly when the institution is deleted.",
            ),
        }
        errors.check(
            self.spot_restore_frequency < 0,
            "spot_restore_frequency",
            "Spot restore frequency cannot be negative.",
        );
        match InstitutionType::parse(&self.institution_type) {
            None => errors.add("institution_type", "Please choose an institution type."),
            Some(InstitutionType::SubscriptionInstitution) => errors.check(
                self.member_institution_id.unwrap_or(0) <= 0,
                "member_institution_id",
                "Subscribing institution must have a parent member.",
            ),
            Some(InstitutionType::MemberInstitution) => {}
        }
        errors.into_result()
    }
}

/// Body for creating an institution.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateInstitutionRequest {
    pub name: String,
    pub identifier: String,
    pub institution_type: InstitutionType,
    #[serde(default)]
    pub member_institution_id: Option<i32>,
    /// Days between restoration spot tests; 0 turns them off
    #[serde(default)]
    pub spot_restore_frequency: i64,
}

impl CreateInstitutionRequest {
    pub fn into_model(self, now: DateTime<Utc>) -> institution::Model {
        institution::Model {
            id: 0,
            receiving_bucket: receiving_bucket_for(&self.identifier),
            restore_bucket: restore_bucket_for(&self.identifier),
            name: self.name,
            identifier: self.identifier,
            state: RecordState::Active.as_str().to_string(),
            institution_type: self.institution_type.as_str().to_string(),
            member_institution_id: self.member_institution_id,
            spot_restore_frequency: self.spot_restore_frequency,
            last_spot_restore_work_item_id: None,
            deactivated_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
