//! Alert inbox.

use actix_web::{HttpResponse, web};

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::AlertView;

/// Alerts addressed to the calling user, newest first.
#[utoipa::path(
    get,
    path = "/alerts",
    tag = "Alerts",
    responses(
        (status = 200, description = "Alerts", body = Vec<AlertView>),
        (status = 403, description = "Admin key has no inbox", body = crate::error::ErrorResponse),
    ),
    security(("api_user" = [], "api_key" = []))
)]
pub async fn list_alerts(auth: ApiKeyAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let user = auth.caller.require_user()?;
    let alerts: Vec<AlertView> = pool
        .alerts_for_user(user)
        .await?
        .into_iter()
        .map(AlertView::from)
        .collect();
    Ok(HttpResponse::Ok().json(alerts))
}

/// Configure alert routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/alerts").route(web::get().to(list_alerts)));
}
