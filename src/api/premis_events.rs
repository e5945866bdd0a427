//! PREMIS event API handlers. Events can be created and read, never changed.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;

use super::found;
use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::entity::premis_event;
use crate::error::{AppError, AppResult};
use crate::models::CreatePremisEventRequest;

/// Record an event.
#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    request_body = CreatePremisEventRequest,
    responses(
        (status = 201, description = "Event recorded", body = premis_event::Model),
        (status = 400, description = "Invalid event", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn create_event(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreatePremisEventRequest>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;

    let model = body.into_inner().into_model(Utc::now());
    found(
        pool.get_intellectual_object(model.intellectual_object_id).await?,
        "Intellectual object",
        model.intellectual_object_id,
    )?;
    if let Some(file_id) = model.generic_file_id {
        found(pool.get_generic_file(file_id).await?, "Generic file", file_id)?;
    }

    let event = pool.save_premis_event(model).await?;
    info!(
        event_id = event.id,
        event_type = %event.event_type,
        object_id = event.intellectual_object_id,
        "Event recorded"
    );
    Ok(HttpResponse::Created().json(event))
}

/// Get an event.
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = premis_event::Model),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn get_event(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let event = found(pool.get_premis_event(id).await?, "Premis event", id)?;
    auth.caller.ensure_institution(event.institution_id)?;
    Ok(HttpResponse::Ok().json(event))
}

/// Events are immutable.
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "Events",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 405, description = "Events cannot be updated", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn update_event(_auth: ApiKeyAuth, _path: web::Path<i32>) -> AppResult<HttpResponse> {
    Err(AppError::NotSupported(
        "premis events cannot be updated".to_string(),
    ))
}

/// Configure event routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/events").route(web::post().to(create_event)))
        .service(
            web::resource("/events/{id}")
                .route(web::get().to(get_event))
                .route(web::put().to(update_event)),
        );
}
