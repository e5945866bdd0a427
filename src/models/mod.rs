//! Domain vocabulary, validation rules and request/response types.

pub mod alert;
pub mod checksum;
pub mod common;
pub mod deletion_request;
pub mod generic_file;
pub mod institution;
pub mod intellectual_object;
pub mod premis_event;
pub mod user;
pub mod validation;
pub mod work_item;

pub use alert::{AlertType, AlertView, SPOT_TEST_SUBJECT};
pub use checksum::CreateChecksumRequest;
pub use common::{Access, RecordState, Role, StorageOption};
pub use deletion_request::{
    ConfirmationTokenBody, DeletionParticipants, DeletionRequestStatus, DeletionRequestView,
    ReviewQuery,
};
pub use generic_file::CreateGenericFileRequest;
pub use institution::{CreateInstitutionRequest, InstitutionType, Lifecycle};
pub use intellectual_object::CreateIntellectualObjectRequest;
pub use premis_event::{CreatePremisEventRequest, EventOutcome, EventType};
pub use user::{AuthenticatedCaller, CreateUserRequest};
pub use validation::ValidationError;
pub use work_item::{
    CreateWorkItemRequest, PendingWorkItemsQuery, RequeueOptionsResponse, RequeueRequest, Stage,
    WorkItemAction, WorkItemStatus, topic_for,
};
