//! Institution API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;

use super::found;
use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::entity::institution;
use crate::error::{AppError, AppResult};
use crate::models::CreateInstitutionRequest;

/// Register an institution.
#[utoipa::path(
    post,
    path = "/institutions",
    tag = "Institutions",
    request_body = CreateInstitutionRequest,
    responses(
        (status = 201, description = "Institution created", body = institution::Model),
        (status = 400, description = "Invalid institution", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not a system admin", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn create_institution(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateInstitutionRequest>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;

    let model = body.into_inner().into_model(Utc::now());
    model.validate()?;
    if let Some(parent_id) = model.member_institution_id {
        found(pool.get_institution(parent_id).await?, "Institution", parent_id)?;
    }

    let inst = pool.insert_institution(model).await?;
    info!(institution_id = inst.id, identifier = %inst.identifier, "Institution created");
    Ok(HttpResponse::Created().json(inst))
}

/// Get an institution.
#[utoipa::path(
    get,
    path = "/institutions/{id}",
    tag = "Institutions",
    params(("id" = i32, Path, description = "Institution id")),
    responses(
        (status = 200, description = "Institution", body = institution::Model),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn get_institution(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    auth.caller.ensure_institution(id)?;
    let inst = found(pool.get_institution(id).await?, "Institution", id)?;
    Ok(HttpResponse::Ok().json(inst))
}

/// Soft-delete an institution. Its rows stay; it is marked `D` with the
/// deactivation time.
#[utoipa::path(
    delete,
    path = "/institutions/{id}",
    tag = "Institutions",
    params(("id" = i32, Path, description = "Institution id")),
    responses(
        (status = 200, description = "Institution deactivated", body = institution::Model),
        (status = 400, description = "Already deleted", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn delete_institution(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;
    let id = path.into_inner();
    let inst = found(pool.get_institution(id).await?, "Institution", id)?;
    if !inst.is_active() {
        return Err(AppError::InvalidInput(format!(
            "Institution {} is already deleted",
            inst.identifier
        )));
    }

    let lifecycle = inst.lifecycle().soft_delete(Utc::now());
    let inst = pool.set_institution_lifecycle(inst, lifecycle).await?;
    info!(institution_id = id, by = auth.caller.label(), "Institution deleted");
    Ok(HttpResponse::Ok().json(inst))
}

/// Reactivate a soft-deleted institution.
#[utoipa::path(
    post,
    path = "/institutions/{id}/undelete",
    tag = "Institutions",
    params(("id" = i32, Path, description = "Institution id")),
    responses(
        (status = 200, description = "Institution reactivated", body = institution::Model),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn undelete_institution(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;
    let id = path.into_inner();
    let inst = found(pool.get_institution(id).await?, "Institution", id)?;

    let lifecycle = inst.lifecycle().undelete();
    let inst = pool.set_institution_lifecycle(inst, lifecycle).await?;
    info!(institution_id = id, by = auth.caller.label(), "Institution undeleted");
    Ok(HttpResponse::Ok().json(inst))
}

/// Configure institution routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/institutions").route(web::post().to(create_institution)))
        .service(
            web::resource("/institutions/{id}")
                .route(web::get().to(get_institution))
                .route(web::delete().to(delete_institution)),
        )
        .service(
            web::resource("/institutions/{id}/undelete").route(web::post().to(undelete_institution)),
        );
}
