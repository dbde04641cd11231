// Route exports
pub mod check_in;
pub mod partners;
pub mod suggestions;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::auth::{AuthError, IdentityVerifier};
use crate::core::{CheckInPolicy, Matcher};
use crate::models::ErrorResponse;
use crate::services::{AppwriteClient, WebhookClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub webhook: Arc<WebhookClient>,
    pub identity: IdentityVerifier,
    pub matcher: Matcher,
    pub check_in: CheckInPolicy,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(partners::configure)
            .configure(check_in::configure)
            .configure(suggestions::configure),
    );
}

pub(crate) fn unauthorized(err: &AuthError) -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(401, "Unauthorized", err.to_string()))
}

pub(crate) fn missing_identity() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(
        401,
        "Unauthorized",
        "Authorization header is required",
    ))
}

/// 500 with a fixed message; details belong in the log line
pub(crate) fn internal_error(error: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(500, error, "Internal server error"))
}
