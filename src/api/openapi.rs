//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, entity, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Preservation Registry",
        version = "0.1.0",
        description = "Registry of preserved objects, files, events and the work items that move them through ingest, restoration and deletion"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Institutions and users
        api::institutions::create_institution,
        api::institutions::get_institution,
        api::institutions::delete_institution,
        api::institutions::undelete_institution,
        api::users::create_user,
        api::users::get_user,
        // Objects and files
        api::intellectual_objects::create_object,
        api::intellectual_objects::get_object,
        api::intellectual_objects::restore_object,
        api::intellectual_objects::start_spot_test,
        api::intellectual_objects::request_object_deletion,
        api::intellectual_objects::finish_object_deletion,
        api::generic_files::create_file,
        api::generic_files::get_file,
        api::generic_files::pending_file_work_items,
        api::generic_files::restore_file,
        api::generic_files::request_file_deletion,
        api::generic_files::finish_file_deletion,
        // Events and checksums
        api::premis_events::create_event,
        api::premis_events::get_event,
        api::premis_events::update_event,
        api::checksums::create_checksum,
        api::checksums::get_checksum,
        api::checksums::update_checksum,
        // Work items
        api::work_items::create_work_item,
        api::work_items::get_work_item,
        api::work_items::update_work_item,
        api::work_items::pending_work_items,
        api::work_items::requeue_options,
        api::work_items::requeue_work_item,
        // Deletions and alerts
        api::deletion_requests::get_deletion_request,
        api::deletion_requests::review_deletion_request,
        api::deletion_requests::approve_deletion_request,
        api::deletion_requests::cancel_deletion_request,
        api::alerts::list_alerts,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::RecordState,
            models::Role,
            models::StorageOption,
            models::Access,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Records
            entity::institution::Model,
            entity::user::Model,
            entity::intellectual_object::Model,
            entity::generic_file::Model,
            entity::checksum::Model,
            entity::premis_event::Model,
            entity::work_item::Model,
            // Requests
            models::InstitutionType,
            models::CreateInstitutionRequest,
            models::CreateUserRequest,
            models::CreateIntellectualObjectRequest,
            models::CreateGenericFileRequest,
            models::CreatePremisEventRequest,
            models::CreateChecksumRequest,
            models::CreateWorkItemRequest,
            // Work items
            models::WorkItemAction,
            models::Stage,
            models::WorkItemStatus,
            models::RequeueRequest,
            models::RequeueOptionsResponse,
            // Deletions
            models::DeletionRequestStatus,
            models::DeletionRequestView,
            models::ConfirmationTokenBody,
            api::intellectual_objects::ObjectDeletionResponse,
            api::generic_files::FileDeletionResponse,
            api::deletion_requests::DeletionApprovedResponse,
            models::AlertView,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Institutions", description = "Depositing institutions"),
        (name = "Users", description = "User accounts"),
        (name = "Objects", description = "Intellectual objects, restoration and deletion"),
        (name = "Files", description = "Generic files, restoration and deletion"),
        (name = "Events", description = "PREMIS events (insert-only)"),
        (name = "Checksums", description = "File checksums (insert-only)"),
        (name = "Work Items", description = "Work item ledger and requeueing"),
        (name = "Deletions", description = "Deletion request review"),
        (name = "Alerts", description = "Stored alerts")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add the API user/key header pair as security schemes.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_user",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Pharos-API-User"))),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Pharos-API-Key"))),
            );
            components.add_security_scheme(
                "admin_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Admin-Key"))),
            );
        }
    }
}
