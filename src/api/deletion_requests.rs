//! Deletion request review handlers.
//!
//! Review, approve and cancel all require the confirmation token from the
//! alert link. Only the encrypted token is stored, so a lost link cannot be
//! recovered.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use super::found;
use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::entity::work_item;
use crate::error::AppResult;
use crate::models::{ConfirmationTokenBody, DeletionRequestView, ReviewQuery};
use crate::services::{QueueClient, deletion_workflow};

/// An approved request and the Delete work item it queued.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletionApprovedResponse {
    pub deletion_request: DeletionRequestView,
    pub work_item: work_item::Model,
}

/// Get a deletion request.
#[utoipa::path(
    get,
    path = "/deletions/{id}",
    tag = "Deletions",
    params(("id" = i32, Path, description = "Deletion request id")),
    responses(
        (status = 200, description = "Deletion request", body = DeletionRequestView),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn get_deletion_request(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let request = found(pool.get_deletion_request(id).await?, "Deletion request", id)?;
    auth.caller.ensure_institution(request.institution_id)?;
    let view = deletion_workflow::describe(&pool, request).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Open a request from its review link.
#[utoipa::path(
    get,
    path = "/deletions/{id}/review",
    tag = "Deletions",
    params(("id" = i32, Path, description = "Deletion request id"), ReviewQuery),
    responses(
        (status = 200, description = "Deletion request", body = DeletionRequestView),
        (status = 403, description = "Token does not match", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn review_deletion_request(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    query: web::Query<ReviewQuery>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let view = deletion_workflow::review(&pool, id, &query.token).await?;
    auth.caller.ensure_institution(view.institution_id)?;
    Ok(HttpResponse::Ok().json(view))
}

/// Approve a request and queue the deletion.
#[utoipa::path(
    post,
    path = "/deletions/{id}/approve",
    tag = "Deletions",
    params(("id" = i32, Path, description = "Deletion request id")),
    request_body = ConfirmationTokenBody,
    responses(
        (status = 200, description = "Deletion approved", body = DeletionApprovedResponse),
        (status = 400, description = "Request already approved or cancelled", body = crate::error::ErrorResponse),
        (status = 403, description = "Token does not match", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not an institutional admin", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn approve_deletion_request(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    queue: web::Data<dyn QueueClient>,
    path: web::Path<i32>,
    body: web::Json<ConfirmationTokenBody>,
) -> AppResult<HttpResponse> {
    let admin = auth.caller.require_user()?;
    let id = path.into_inner();

    let (request, work_item) =
        deletion_workflow::approve(&pool, queue.get_ref(), id, &body.token, admin).await?;
    let deletion_request = deletion_workflow::describe(&pool, request).await?;
    Ok(HttpResponse::Ok().json(DeletionApprovedResponse {
        deletion_request,
        work_item,
    }))
}

/// Cancel a pending request.
#[utoipa::path(
    post,
    path = "/deletions/{id}/cancel",
    tag = "Deletions",
    params(("id" = i32, Path, description = "Deletion request id")),
    request_body = ConfirmationTokenBody,
    responses(
        (status = 200, description = "Deletion cancelled", body = DeletionRequestView),
        (status = 400, description = "Request already approved or cancelled", body = crate::error::ErrorResponse),
        (status = 403, description = "Token does not match", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn cancel_deletion_request(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<ConfirmationTokenBody>,
) -> AppResult<HttpResponse> {
    let admin = auth.caller.require_user()?;
    let id = path.into_inner();

    let request = deletion_workflow::cancel(&pool, id, &body.token, admin).await?;
    let view = deletion_workflow::describe(&pool, request).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Configure deletion request routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/deletions/{id}").route(web::get().to(get_deletion_request)))
        .service(
            web::resource("/deletions/{id}/review").route(web::get().to(review_deletion_request)),
        )
        .service(
            web::resource("/deletions/{id}/approve")
                .route(web::post().to(approve_deletion_request)),
        )
        .service(
            web::resource("/deletions/{id}/cancel").route(web::post().to(cancel_deletion_request)),
        );
}
