//! Business logic services.

pub mod api_key;
pub mod deletion;
pub mod deletion_workflow;
pub mod queue;
pub mod token;
pub mod work_items;

pub use queue::{NsqClient, QueueClient};
