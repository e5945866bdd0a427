//! API endpoint modules.

pub mod alerts;
pub mod checksums;
pub mod deletion_requests;
pub mod generic_files;
pub mod health;
pub mod institutions;
pub mod intellectual_objects;
pub mod openapi;
pub mod premis_events;
pub mod users;
pub mod work_items;

use actix_web::web;

use crate::error::{AppError, AppResult};

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Mount every registry route. Callers wrap this in the `/api/v1` scope.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(institutions::configure_routes)
        .configure(users::configure_routes)
        .configure(intellectual_objects::configure_routes)
        .configure(generic_files::configure_routes)
        .configure(premis_events::configure_routes)
        .configure(checksums::configure_routes)
        .configure(work_items::configure_routes)
        .configure(deletion_requests::configure_routes)
        .configure(alerts::configure_routes);
}

/// Turn a missing row into a 404.
pub(crate) fn found<T>(row: Option<T>, what: &str, id: i32) -> AppResult<T> {
    row.ok_or_else(|| AppError::NotFound(format!("{} {}", what, id)))
}
