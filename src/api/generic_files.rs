//! Generic file API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::found;
use crate::auth::ApiKeyAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::entity::{generic_file, premis_event, work_item};
use crate::error::{AppError, AppResult};
use crate::models::{CreateGenericFileRequest, DeletionRequestView};
use crate::services::{QueueClient, deletion, deletion_workflow, work_items};

/// A file after deletion, with the event recording it.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileDeletionResponse {
    pub generic_file: generic_file::Model,
    pub event: premis_event::Model,
}

/// Record a file belonging to an object.
#[utoipa::path(
    post,
    path = "/files",
    tag = "Files",
    request_body = CreateGenericFileRequest,
    responses(
        (status = 201, description = "File created", body = generic_file::Model),
        (status = 400, description = "Invalid file", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn create_file(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateGenericFileRequest>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;

    let model = body.into_inner().into_model(Utc::now());
    model.validate()?;
    let obj = found(
        pool.get_intellectual_object(model.intellectual_object_id).await?,
        "Intellectual object",
        model.intellectual_object_id,
    )?;
    if obj.institution_id != model.institution_id {
        return Err(AppError::InvalidInput(format!(
            "File institution {} does not match object institution {}",
            model.institution_id, obj.institution_id
        )));
    }

    let gf = pool.insert_generic_file(model).await?;
    info!(generic_file_id = gf.id, identifier = %gf.identifier, "File created");
    Ok(HttpResponse::Created().json(gf))
}

/// Get a file.
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "Files",
    params(("id" = i32, Path, description = "File id")),
    responses(
        (status = 200, description = "File", body = generic_file::Model),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn get_file(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let gf = found(pool.get_generic_file(id).await?, "Generic file", id)?;
    auth.caller.ensure_institution(gf.institution_id)?;
    Ok(HttpResponse::Ok().json(gf))
}

/// Work items still in flight for a file, newest first.
#[utoipa::path(
    get,
    path = "/files/{id}/pending_work_items",
    tag = "Files",
    params(("id" = i32, Path, description = "File id")),
    responses(
        (status = 200, description = "Pending work items", body = Vec<work_item::Model>),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn pending_file_work_items(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let gf = found(pool.get_generic_file(id).await?, "Generic file", id)?;
    auth.caller.ensure_institution(gf.institution_id)?;
    let items = pool.work_items_pending_for_file(gf.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Ask for one file to be restored.
#[utoipa::path(
    post,
    path = "/files/{id}/restore",
    tag = "Files",
    params(("id" = i32, Path, description = "File id")),
    responses(
        (status = 201, description = "Restoration queued", body = work_item::Model),
        (status = 409, description = "File has pending work items", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn restore_file(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    queue: web::Data<dyn QueueClient>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = auth.caller.require_user()?;
    let id = path.into_inner();
    let gf = found(pool.get_generic_file(id).await?, "Generic file", id)?;
    auth.caller.ensure_institution(gf.institution_id)?;
    let obj = found(
        pool.get_intellectual_object(gf.intellectual_object_id).await?,
        "Intellectual object",
        gf.intellectual_object_id,
    )?;

    let item =
        work_items::initiate_file_restoration(&pool, queue.get_ref(), &obj, &gf, user).await?;
    Ok(HttpResponse::Created().json(item))
}

/// Ask for one file to be deleted.
#[utoipa::path(
    post,
    path = "/files/{id}/request_delete",
    tag = "Files",
    params(("id" = i32, Path, description = "File id")),
    responses(
        (status = 201, description = "Deletion requested", body = DeletionRequestView),
        (status = 409, description = "File has pending work items", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn request_file_deletion(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = auth.caller.require_user()?;
    let id = path.into_inner();
    let gf = found(pool.get_generic_file(id).await?, "Generic file", id)?;

    let request =
        deletion_workflow::initiate_file_deletion(&pool, &config.base_url, user, &gf).await?;
    let view = deletion_workflow::describe(&pool, request).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Called by the deletion worker once the file is gone from storage.
#[utoipa::path(
    post,
    path = "/files/{id}/finish_delete",
    tag = "Files",
    params(("id" = i32, Path, description = "File id")),
    responses(
        (status = 200, description = "File deleted", body = FileDeletionResponse),
        (status = 409, description = "Deletion precondition failed", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn finish_file_deletion(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;
    let id = path.into_inner();
    let gf = found(pool.get_generic_file(id).await?, "Generic file", id)?;

    let (generic_file, event) = deletion::delete_file(&pool, gf).await?;
    Ok(HttpResponse::Ok().json(FileDeletionResponse {
        generic_file,
        event,
    }))
}

/// Configure file routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/files").route(web::post().to(create_file)))
        .service(web::resource("/files/{id}").route(web::get().to(get_file)))
        .service(
            web::resource("/files/{id}/pending_work_items")
                .route(web::get().to(pending_file_work_items)),
        )
        .service(web::resource("/files/{id}/restore").route(web::post().to(restore_file)))
        .service(web::resource("/files/{id}/request_delete").route(web::post().to(request_file_deletion)))
        .service(
            web::resource("/files/{id}/finish_delete").route(web::post().to(finish_file_deletion)),
        );
}
