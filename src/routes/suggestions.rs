use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::Value;
use crate::models::ErrorResponse;
use crate::routes::{missing_identity, unauthorized, AppState};
use crate::services::WebhookError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/suggestions", web::post().to(suggest));
}

/// Proxy a suggestion request to the AI webhook
///
/// POST /api/v1/suggestions
///
/// The JSON body is forwarded as-is with the caller's `userId` added, and the
/// webhook's JSON answer is returned unchanged.
async fn suggest(
    state: web::Data<AppState>,
    body: web::Json<Value>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match state.identity.viewer_id(&http_req) {
        Ok(Some(id)) => id,
        Ok(None) => return missing_identity(),
        Err(e) => return unauthorized(&e),
    };

    let mut payload = body.into_inner();
    match payload.as_object_mut() {
        Some(obj) => {
            obj.insert("userId".to_string(), Value::String(user_id.clone()));
        }
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                400,
                "Invalid payload",
                "Request body must be a JSON object",
            ));
        }
    }

    match state.webhook.forward_suggestion(&payload).await {
        Ok(answer) => HttpResponse::Ok().json(answer),
        Err(WebhookError::NotConfigured) => HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
            503,
            "Suggestions unavailable",
            "No suggestion webhook configured",
        )),
        Err(e) => {
            tracing::error!("Suggestion webhook failed for {}: {}", user_id, e);
            HttpResponse::BadGateway().json(ErrorResponse::new(502, "Suggestion webhook failed", e.to_string()))
        }
    }
}
