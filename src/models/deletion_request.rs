//! Deletion request rules.
//!
//! A request is created pending. It ends either approved (a confirmer is
//! set) or cancelled (a canceller is set), never both.

use argon2::password_hash::PasswordHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::{deletion_request, user};
use crate::models::validation::ValidationError;

/// True when `token` parses as a PHC hash string rather than a plaintext
/// token.
pub fn looks_encrypted(token: &str) -> bool {
    PasswordHash::new(token).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeletionRequestStatus {
    Pending,
    Approved,
    Cancelled,
}

/// Users referenced by a deletion request, loaded by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeletionParticipants<'a> {
    pub requester: Option<&'a user::Model>,
    pub confirmer: Option<&'a user::Model>,
    pub canceller: Option<&'a user::Model>,
}

impl deletion_request::Model {
    pub fn status(&self) -> DeletionRequestStatus {
        if self.confirmed_by_id.is_some() {
            DeletionRequestStatus::Approved
        } else if self.cancelled_by_id.is_some() {
            DeletionRequestStatus::Cancelled
        } else {
            DeletionRequestStatus::Pending
        }
    }

    pub fn validate(&self, people: DeletionParticipants<'_>) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(
            self.institution_id <= 0,
            "institution_id",
            "Deletion request requires institution id.",
        );
        if self.requested_by_id <= 0 {
            errors.add("requested_by_id", "Deletion request requires requester id.");
        } else {
            self.check_user(&mut errors, "requested_by_id", people.requester, None);
        }
        if self.confirmed_by_id.is_some() {
            self.check_user(
                &mut errors,
                "confirmed_by_id",
                people.confirmer,
                Some("Deletion confirmer must be institutional admin."),
            );
        }
        if self.cancelled_by_id.is_some() {
            self.check_user(
                &mut errors,
                "cancelled_by_id",
                people.canceller,
                Some("Deletion canceller must be institutional admin."),
            );
        }
        errors.check(
            self.confirmed_by_id.is_some() && self.cancelled_by_id.is_some(),
            "cancelled_by_id",
            "Deletion request cannot be both confirmed and cancelled.",
        );
        errors.check(
            !looks_encrypted(&self.encrypted_confirmation_token),
            "encrypted_confirmation_token",
            "Token must be encrypted.",
        );
        errors.into_result()
    }

    fn check_user(
        &self,
        errors: &mut ValidationError,
        field: &str,
        user: Option<&user::Model>,
        admin_message: Option<&str>,
    ) {
        let Some(user) = user else {
            errors.add(field, "User does not exist.");
            return;
        };
        errors.check(!user.is_active(), field, "User has been deactivated.");
        errors.check(
            user.institution_id != self.institution_id,
            field,
            "Deletion request user belongs to wrong institution.",
        );
        if let Some(message) = admin_message {
            errors.check(!user.is_inst_admin(), field, message);
        }
    }
}

/// Deletion request with the people and items it refers to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletionRequestView {
    pub id: i32,
    pub institution_id: i32,
    pub status: DeletionRequestStatus,
    pub requested_by: String,
    pub requested_at: DateTime<Utc>,
    pub confirmed_by: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub work_item_id: Option<i32>,
    pub intellectual_object_ids: Vec<i32>,
    pub generic_file_ids: Vec<i32>,
}

/// Body carrying a confirmation token.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConfirmationTokenBody {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewQuery {
    pub token: String,
}
