//! SeaORM entity definitions.

pub mod alert;
pub mod alert_user;
pub mod checksum;
pub mod deletion_request;
pub mod deletion_request_generic_file;
pub mod deletion_request_intellectual_object;
pub mod generic_file;
pub mod institution;
pub mod intellectual_object;
pub mod premis_event;
pub mod user;
pub mod work_item;
