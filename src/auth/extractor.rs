//! Actix-web extractor for API key authentication.
//!
//! Callers send `X-Pharos-API-User` (their email) and `X-Pharos-API-Key`.
//! The bootstrap `X-Admin-Key` is accepted as a system administrator with
//! no user record. Secret header values are held in `SecretString` and are
//! never logged.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};

use super::AdminKey;
use crate::config::{ADMIN_KEY_HEADER, API_KEY_HEADER, API_USER_HEADER};
use crate::db::DbPool;
use crate::error::{AppError, ErrorResponse};
use crate::models::AuthenticatedCaller;
use crate::services::api_key;

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

fn extract_header(req: &HttpRequest, header_name: &str) -> Option<String> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    status: StatusCode,
    message: String,
}

impl AuthError {
    fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Unauthorized(msg) => Self::unauthorized(msg),
            other => {
                tracing::error!("Authentication lookup failed: {}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Authentication could not be completed".to_string(),
                }
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let code = if self.status == StatusCode::UNAUTHORIZED {
            "UNAUTHORIZED"
        } else {
            "INTERNAL_ERROR"
        };
        HttpResponse::build(self.status).json(ErrorResponse {
            error: code.to_string(),
            message: self.message.clone(),
            fields: None,
        })
    }
}

/// Extractor that requires valid credentials.
///
/// ```ignore
/// async fn protected_handler(auth: ApiKeyAuth) -> impl Responder {
///     // auth.caller says who is calling and with which role
/// }
/// ```
pub struct ApiKeyAuth {
    pub caller: AuthenticatedCaller,
}

impl FromRequest for ApiKeyAuth {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let stored_admin_key = req.app_data::<web::Data<AdminKey>>().cloned();

        let provided_admin_key = extract_secret_header(req, ADMIN_KEY_HEADER);
        let provided_api_key = extract_secret_header(req, API_KEY_HEADER);
        let api_user = extract_header(req, API_USER_HEADER);

        Box::pin(async move {
            // Bootstrap admin key first; constant-time comparison.
            if let (Some(provided), Some(key)) = (&provided_admin_key, &stored_admin_key)
                && key.verify(provided.expose_secret())
            {
                return Ok(ApiKeyAuth {
                    caller: AuthenticatedCaller::bootstrap(),
                });
            }

            let pool = pool.ok_or_else(|| AuthError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Internal configuration error".to_string(),
            })?;

            match (api_user, provided_api_key) {
                (Some(email), Some(key)) => {
                    let caller = api_key::verify_key(&pool, &email, key.expose_secret()).await?;
                    Ok(ApiKeyAuth { caller })
                }
                _ => Err(AuthError::unauthorized(format!(
                    "Missing credentials. Provide {} and {} headers.",
                    API_USER_HEADER, API_KEY_HEADER
                ))),
            }
        })
    }
}
