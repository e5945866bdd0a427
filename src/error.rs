//! Domain error types for the preservation registry.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use std::collections::BTreeMap;
use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::models::ValidationError;

/// Why an object or file may not be deleted yet.
///
/// Checks run in a fixed order and the first failing one is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("object has active files")]
    ActiveFilesExist,

    #[error("item is already deleted")]
    AlreadyDeleted,

    #[error("item was deleted after its last ingest")]
    DeletedSinceLastIngest,

    #[error("item has no ingest event")]
    MissingIngestEvent,

    #[error("no active deletion work item")]
    MissingWorkItem,

    #[error("deletion work item {work_item_id} has no institutional approver")]
    MissingApprover { work_item_id: i32 },

    #[error("no deletion request for work item {work_item_id}")]
    MissingDeletionRequest { work_item_id: i32 },

    #[error("deletion request {deletion_request_id} has no requester")]
    MissingRequester { deletion_request_id: i32 },

    #[error("deletion request {deletion_request_id} has not been confirmed")]
    MissingConfirmer { deletion_request_id: i32 },
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Field-level validation failed
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks the role or institution for this action
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Object or file cannot be deleted yet
    #[error("Deletion precondition failed: {0}")]
    DeletionPrecondition(#[from] PreconditionError),

    /// Operation is not allowed on this kind of record (e.g. updating an event)
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Target stage is not legal for the work item's action
    #[error("Item with action '{action}' cannot be requeued to stage '{stage}'")]
    InvalidRequeue { action: String, stage: String },

    /// In-flight work items block this action
    #[error("Task cannot be completed because this item has pending work items")]
    PendingWorkItems,

    /// Confirmation token did not match
    #[error("Invalid confirmation token")]
    InvalidToken,

    /// Publishing to the work queue failed
    #[error("Queue error: {0}")]
    Queue(String),

    /// Unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidRequeue { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::DeletionPrecondition(_) | AppError::PendingWorkItems => StatusCode::CONFLICT,
            AppError::NotSupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Queue(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, response_message) = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                (
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::NotFound(_) => ("NOT_FOUND", self.to_string()),
            AppError::InvalidInput(_) => ("INVALID_INPUT", self.to_string()),
            AppError::Validation(_) => ("VALIDATION_FAILED", self.to_string()),
            AppError::Unauthorized(_) => ("UNAUTHORIZED", self.to_string()),
            AppError::Forbidden(_) => ("FORBIDDEN", self.to_string()),
            AppError::DeletionPrecondition(_) => ("DELETION_PRECONDITION_FAILED", self.to_string()),
            AppError::NotSupported(_) => ("NOT_SUPPORTED", self.to_string()),
            AppError::InvalidRequeue { .. } => ("INVALID_REQUEUE", self.to_string()),
            AppError::PendingWorkItems => ("PENDING_WORK_ITEMS", self.to_string()),
            AppError::InvalidToken => ("INVALID_TOKEN", self.to_string()),
            AppError::Queue(err_str) => {
                tracing::error!("Queue error: {}", err_str);
                ("QUEUE_ERROR", "Work item could not be queued".to_string())
            }
            AppError::Internal(err_str) => {
                tracing::error!("Internal error: {}", err_str);
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        };

        let fields = match self {
            AppError::Validation(v) => Some(v.errors.clone()),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
            fields,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Per-field messages for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Queue(err.to_string())
    }
}
