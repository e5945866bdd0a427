//! Request logging middleware.
//!
//! One line per finished request naming the caller, route and outcome. The
//! caller is identified by the API user header; key material is never
//! logged.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::Instant;
use tracing::{info, warn};

use crate::config::{ADMIN_KEY_HEADER, API_USER_HEADER};

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

/// Who is calling: the API user's email, the bootstrap admin key, or nobody.
fn caller_label(req: &ServiceRequest) -> String {
    if let Some(email) = req
        .headers()
        .get(API_USER_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return email.to_string();
    }
    if req.headers().contains_key(ADMIN_KEY_HEADER) {
        "admin-key".to_string()
    } else {
        "anonymous".to_string()
    }
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let caller = caller_label(&req);

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status().as_u16();
            let duration_ms = start.elapsed().as_millis() as u64;

            if res.status().is_success() {
                info!(target: "api", %method, %path, %caller, status, duration_ms, "Request completed");
            } else {
                warn!(target: "api", %method, %path, %caller, status, duration_ms, "Request failed");
            }
            Ok(res)
        })
    }
}
