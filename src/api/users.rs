//! User API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;

use super::found;
use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::CreateUserRequest;

/// Create a user. API keys are issued separately with `generate-api-key`.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = user::Model),
        (status = 400, description = "Invalid user", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn create_user(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;

    let model = body.into_inner().into_model(Utc::now());
    model.validate()?;
    let inst = found(
        pool.get_institution(model.institution_id).await?,
        "Institution",
        model.institution_id,
    )?;
    if !inst.is_active() {
        return Err(AppError::InvalidInput(format!(
            "Institution {} is deleted",
            inst.identifier
        )));
    }
    if pool.get_user_by_email(&model.email).await?.is_some() {
        return Err(AppError::InvalidInput(format!(
            "A user with email {} already exists",
            model.email
        )));
    }

    let user = pool.insert_user(model).await?;
    info!(user_id = user.id, email = %user.email, role = %user.role, "User created");
    Ok(HttpResponse::Created().json(user))
}

/// Get a user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = user::Model),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn get_user(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = found(pool.get_user(id).await?, "User", id)?;
    auth.caller.ensure_institution(user.institution_id)?;
    Ok(HttpResponse::Ok().json(user))
}

/// Configure user routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::post().to(create_user)))
        .service(web::resource("/users/{id}").route(web::get().to(get_user)));
}
