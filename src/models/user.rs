//! User rules and the authenticated caller.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::common::Role;
use crate::models::validation::{ValidationError, looks_like_email};

impl user::Model {
    pub fn role_kind(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn is_sys_admin(&self) -> bool {
        self.role_kind() == Some(Role::Admin)
    }

    pub fn is_inst_admin(&self) -> bool {
        self.role_kind() == Some(Role::InstitutionalAdmin)
    }

    pub fn is_active(&self) -> bool {
        self.deactivated_at.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(self.name.trim().is_empty(), "name", "Name is required.");
        errors.check(
            !looks_like_email(&self.email),
            "email",
            "Email address is required.",
        );
        errors.check(
            self.role_kind().is_none(),
            "role",
            "Please choose a valid role.",
        );
        errors.check(
            self.institution_id <= 0,
            "institution_id",
            "Please choose an institution.",
        );
        errors.into_result()
    }
}

/// Body for creating a user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub institution_id: i32,
}

impl CreateUserRequest {
    pub fn into_model(self, now: DateTime<Utc>) -> user::Model {
        user::Model {
            id: 0,
            name: self.name,
            email: self.email,
            role: self.role.as_str().to_string(),
            institution_id: self.institution_id,
            api_key_hash: None,
            deactivated_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Who is making a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller {
    /// `None` when authenticated with the bootstrap admin key.
    pub user: Option<user::Model>,
    pub role: Role,
}

impl AuthenticatedCaller {
    pub fn bootstrap() -> Self {
        Self {
            user: None,
            role: Role::Admin,
        }
    }

    pub fn from_user(user: user::Model) -> AppResult<Self> {
        let role = user
            .role_kind()
            .ok_or_else(|| AppError::Unauthorized(format!("User {} has no valid role", user.email)))?;
        Ok(Self {
            user: Some(user),
            role,
        })
    }

    pub fn is_sys_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to log for this caller.
    pub fn label(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.email.as_str())
            .unwrap_or("admin-key")
    }

    /// The caller's user record; actions that are attributed to a person need one.
    pub fn require_user(&self) -> AppResult<&user::Model> {
        self.user.as_ref().ok_or_else(|| {
            AppError::Forbidden("This action requires a user account, not the admin key".to_string())
        })
    }

    pub fn require_sys_admin(&self) -> AppResult<()> {
        if self.is_sys_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only system administrators may do this".to_string(),
            ))
        }
    }

    /// System admins see everything; everyone else sees their own institution.
    pub fn ensure_institution(&self, institution_id: i32) -> AppResult<()> {
        if self.is_sys_admin() {
            return Ok(());
        }
        match &self.user {
            Some(u) if u.institution_id == institution_id => Ok(()),
            _ => Err(AppError::Forbidden(format!(
                "No access to institution {}",
                institution_id
            ))),
        }
    }
}
