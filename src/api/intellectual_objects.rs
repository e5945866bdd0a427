//! Intellectual object API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::found;
use crate::auth::ApiKeyAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::entity::{intellectual_object, premis_event};
use crate::error::AppResult;
use crate::models::{CreateIntellectualObjectRequest, DeletionRequestView};
use crate::services::{QueueClient, deletion, deletion_workflow, work_items};

/// An object after deletion, with the event recording it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ObjectDeletionResponse {
    pub intellectual_object: intellectual_object::Model,
    pub event: premis_event::Model,
}

/// Record an ingested object.
#[utoipa::path(
    post,
    path = "/objects",
    tag = "Objects",
    request_body = CreateIntellectualObjectRequest,
    responses(
        (status = 201, description = "Object created", body = intellectual_object::Model),
        (status = 400, description = "Invalid object", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn create_object(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateIntellectualObjectRequest>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;

    let model = body.into_inner().into_model(Utc::now());
    model.validate()?;
    found(
        pool.get_institution(model.institution_id).await?,
        "Institution",
        model.institution_id,
    )?;

    let obj = pool.insert_intellectual_object(model).await?;
    info!(object_id = obj.id, identifier = %obj.identifier, "Object created");
    Ok(HttpResponse::Created().json(obj))
}

/// Get an object.
#[utoipa::path(
    get,
    path = "/objects/{id}",
    tag = "Objects",
    params(("id" = i32, Path, description = "Object id")),
    responses(
        (status = 200, description = "Object", body = intellectual_object::Model),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn get_object(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let obj = found(pool.get_intellectual_object(id).await?, "Intellectual object", id)?;
    auth.caller.ensure_institution(obj.institution_id)?;
    Ok(HttpResponse::Ok().json(obj))
}

/// Ask for the whole object to be restored.
#[utoipa::path(
    post,
    path = "/objects/{id}/restore",
    tag = "Objects",
    params(("id" = i32, Path, description = "Object id")),
    responses(
        (status = 201, description = "Restoration queued", body = crate::entity::work_item::Model),
        (status = 409, description = "Object has pending work items", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn restore_object(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    queue: web::Data<dyn QueueClient>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = auth.caller.require_user()?;
    let id = path.into_inner();
    let obj = found(pool.get_intellectual_object(id).await?, "Intellectual object", id)?;
    auth.caller.ensure_institution(obj.institution_id)?;

    let item = work_items::initiate_object_restoration(&pool, queue.get_ref(), &obj, user).await?;
    Ok(HttpResponse::Created().json(item))
}

/// Restore the object as its institution's next spot test. Institution
/// users are alerted when the restoration succeeds.
#[utoipa::path(
    post,
    path = "/objects/{id}/spot_test",
    tag = "Objects",
    params(("id" = i32, Path, description = "Object id")),
    responses(
        (status = 201, description = "Spot test restoration queued", body = crate::entity::work_item::Model),
        (status = 400, description = "Institution does not run spot tests", body = crate::error::ErrorResponse),
        (status = 409, description = "Object has pending work items", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn start_spot_test(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    queue: web::Data<dyn QueueClient>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;
    let user = auth.caller.require_user()?;
    let id = path.into_inner();
    let obj = found(pool.get_intellectual_object(id).await?, "Intellectual object", id)?;

    let item = work_items::initiate_spot_test(&pool, queue.get_ref(), &obj, user).await?;
    Ok(HttpResponse::Created().json(item))
}

/// Ask for the object to be deleted. Institutional admins are alerted with a
/// review link.
#[utoipa::path(
    post,
    path = "/objects/{id}/request_delete",
    tag = "Objects",
    params(("id" = i32, Path, description = "Object id")),
    responses(
        (status = 201, description = "Deletion requested", body = DeletionRequestView),
        (status = 409, description = "Object has pending work items", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn request_object_deletion(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = auth.caller.require_user()?;
    let id = path.into_inner();
    let obj = found(pool.get_intellectual_object(id).await?, "Intellectual object", id)?;

    let request =
        deletion_workflow::initiate_object_deletion(&pool, &config.base_url, user, &obj).await?;
    let view = deletion_workflow::describe(&pool, request).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Called by the deletion worker once storage is gone: marks the object
/// deleted and records the deletion event.
#[utoipa::path(
    post,
    path = "/objects/{id}/finish_delete",
    tag = "Objects",
    params(("id" = i32, Path, description = "Object id")),
    responses(
        (status = 200, description = "Object deleted", body = ObjectDeletionResponse),
        (status = 409, description = "Deletion precondition failed", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn finish_object_deletion(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;
    let id = path.into_inner();
    let obj = found(pool.get_intellectual_object(id).await?, "Intellectual object", id)?;

    let (intellectual_object, event) = deletion::delete_object(&pool, obj).await?;
    Ok(HttpResponse::Ok().json(ObjectDeletionResponse {
        intellectual_object,
        event,
    }))
}

/// Configure object routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/objects").route(web::post().to(create_object)))
        .service(web::resource("/objects/{id}").route(web::get().to(get_object)))
        .service(web::resource("/objects/{id}/restore").route(web::post().to(restore_object)))
        .service(web::resource("/objects/{id}/spot_test").route(web::post().to(start_spot_test)))
        .service(
            web::resource("/objects/{id}/request_delete").route(web::post().to(request_object_deletion)),
        )
        .service(
            web::resource("/objects/{id}/finish_delete")
                .route(web::post().to(finish_object_deletion)),
        );
}
