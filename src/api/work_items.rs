//! Work item API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;

use super::found;
use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::entity::work_item;
use crate::error::AppResult;
use crate::models::{
    CreateWorkItemRequest, PendingWorkItemsQuery, RequeueOptionsResponse, RequeueRequest,
};
use crate::services::{QueueClient, work_items};

/// Create a work item. Workers do this when a bag lands in a receiving bucket.
#[utoipa::path(
    post,
    path = "/work_items",
    tag = "Work Items",
    request_body = CreateWorkItemRequest,
    responses(
        (status = 201, description = "Work item created", body = work_item::Model),
        (status = 400, description = "Invalid work item", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn create_work_item(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateWorkItemRequest>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;

    let model = body.into_inner().into_model(Utc::now());
    found(
        pool.get_institution(model.institution_id).await?,
        "Institution",
        model.institution_id,
    )?;

    let item = pool.save_work_item(model).await?;
    info!(
        work_item_id = item.id,
        name = %item.name,
        action = %item.action,
        "Work item created"
    );
    Ok(HttpResponse::Created().json(item))
}

/// Get a work item.
#[utoipa::path(
    get,
    path = "/work_items/{id}",
    tag = "Work Items",
    params(("id" = i32, Path, description = "Work item id")),
    responses(
        (status = 200, description = "Work item", body = work_item::Model),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn get_work_item(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let item = found(pool.get_work_item(id).await?, "Work item", id)?;
    auth.caller.ensure_institution(item.institution_id)?;
    Ok(HttpResponse::Ok().json(item))
}

/// Record worker progress. Identity fields (name, etag, action) are fixed.
#[utoipa::path(
    put,
    path = "/work_items/{id}",
    tag = "Work Items",
    params(("id" = i32, Path, description = "Work item id")),
    request_body = work_item::Model,
    responses(
        (status = 200, description = "Work item updated", body = work_item::Model),
        (status = 400, description = "Invalid update", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn update_work_item(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<work_item::Model>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;
    let id = path.into_inner();
    found(pool.get_work_item(id).await?, "Work item", id)?;

    let mut item = body.into_inner();
    item.id = id;
    let item = pool.save_work_item(item).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Work items still in flight for a bag, newest first.
#[utoipa::path(
    get,
    path = "/work_items/pending",
    tag = "Work Items",
    params(PendingWorkItemsQuery),
    responses(
        (status = 200, description = "Pending work items", body = Vec<work_item::Model>),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn pending_work_items(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    query: web::Query<PendingWorkItemsQuery>,
) -> AppResult<HttpResponse> {
    auth.caller.ensure_institution(query.institution_id)?;
    let items = pool
        .work_items_pending_for_object(query.institution_id, &query.bag_name)
        .await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Stages the item may be sent back to.
#[utoipa::path(
    get,
    path = "/work_items/{id}/requeue_options",
    tag = "Work Items",
    params(("id" = i32, Path, description = "Work item id")),
    responses(
        (status = 200, description = "Requeue options", body = RequeueOptionsResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn requeue_options(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;
    let id = path.into_inner();
    let item = found(pool.get_work_item(id).await?, "Work item", id)?;

    Ok(HttpResponse::Ok().json(RequeueOptionsResponse {
        work_item_id: item.id,
        stages: item.requeue_options(),
        action: item.action,
        current_stage: item.stage,
    }))
}

/// Send an item back to a stage and publish it on that stage's topic.
#[utoipa::path(
    post,
    path = "/work_items/{id}/requeue",
    tag = "Work Items",
    params(("id" = i32, Path, description = "Work item id")),
    request_body = RequeueRequest,
    responses(
        (status = 200, description = "Work item requeued", body = work_item::Model),
        (status = 400, description = "Stage not valid for this action", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn requeue_work_item(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    queue: web::Data<dyn QueueClient>,
    path: web::Path<i32>,
    body: web::Json<RequeueRequest>,
) -> AppResult<HttpResponse> {
    auth.caller.require_sys_admin()?;
    let id = path.into_inner();
    let item = found(pool.get_work_item(id).await?, "Work item", id)?;

    let item = work_items::requeue_work_item(&pool, queue.get_ref(), item, body.stage).await?;
    info!(
        work_item_id = item.id,
        stage = %item.stage,
        by = auth.caller.label(),
        "Work item requeued"
    );
    Ok(HttpResponse::Ok().json(item))
}

/// Configure work item routes. `/pending` is registered ahead of `/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/work_items").route(web::post().to(create_work_item)))
        .service(web::resource("/work_items/pending").route(web::get().to(pending_work_items)))
        .service(
            web::resource("/work_items/{id}")
                .route(web::get().to(get_work_item))
                .route(web::put().to(update_work_item)),
        )
        .service(
            web::resource("/work_items/{id}/requeue_options").route(web::get().to(requeue_options)),
        )
        .service(
            web::resource("/work_items/{id}/requeue").route(web::post().to(requeue_work_item)),
        );
}
