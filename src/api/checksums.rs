//! Checksum API handlers. Like events, checksums are insert-only.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use super::found;
use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::entity::checksum;
use crate::error::{AppError, AppResult};
use crate::models::CreateChecksumRequest;

/// Record a checksum for a file.
#[utoipa::path(
    post,
    path = "/checksums",
    tag = "Checksums",
    request_body = CreateChecksumRequest,
    responses(
        (status = 201, description = "Checksum recorded", body = checksum::Model),
        (status = 400, description = "Invalid checksum", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn create_checksum(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateChecksumRequest>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;

    let model = body.into_inner().into_model(Utc::now());
    found(
        pool.get_generic_file(model.generic_file_id).await?,
        "Generic file",
        model.generic_file_id,
    )?;

    let checksum = pool.save_checksum(model).await?;
    Ok(HttpResponse::Created().json(checksum))
}

/// Get a checksum.
#[utoipa::path(
    get,
    path = "/checksums/{id}",
    tag = "Checksums",
    params(("id" = i32, Path, description = "Checksum id")),
    responses(
        (status = 200, description = "Checksum", body = checksum::Model),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn get_checksum(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let checksum = found(pool.get_checksum(id).await?, "Checksum", id)?;
    let gf = found(
        pool.get_generic_file(checksum.generic_file_id).await?,
        "Generic file",
        checksum.generic_file_id,
    )?;
    auth.caller.ensure_institution(gf.institution_id)?;
    Ok(HttpResponse::Ok().json(checksum))
}

#[utoipa::path(
    put,
    path = "/checksums/{id}",
    tag = "Checksums",
    params(("id" = i32, Path, description = "Checksum id")),
    responses(
        (status = 405, description = "Checksums cannot be updated", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn update_checksum(_auth: ApiKeyAuth, _path: web::Path<i32>) -> AppResult<HttpResponse> {
    Err(AppError::NotSupported("checksums cannot be updated".to_string()))
}

/// Configure checksum routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/checksums").route(web::post().to(create_checksum)))
        .service(
            web::resource("/checksums/{id}")
                .route(web::get().to(get_checksum))
                .route(web::put().to(update_checksum)),
        );
}
