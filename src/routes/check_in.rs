use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::core::CheckInOutcome;
use crate::models::{CheckInRequest, CheckInResponse, ErrorResponse, GeoPoint};
use crate::routes::{internal_error, missing_identity, unauthorized, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/check-in", web::post().to(check_in));
}

/// Automatic gym check-in
///
/// POST /api/v1/check-in
///
/// Request body:
/// ```json
/// { "latitude": 52.52, "longitude": 13.405 }
/// ```
///
/// Marks today's attendance and bumps the streak when the caller is within
/// the check-in radius of their gym during opening hours. Any other outcome
/// is reported in `status` without touching the profile.
async fn check_in(
    state: web::Data<AppState>,
    req: web::Json<CheckInRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match state.identity.viewer_id(&http_req) {
        Ok(Some(id)) => id,
        Ok(None) => return missing_identity(),
        Err(e) => return unauthorized(&e),
    };

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(400, "Validation failed", errors.to_string()));
    }

    let profile = match state.appwrite.get_profile(&user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::new(
                404,
                "Profile not found",
                format!("No profile for user {}", user_id),
            ));
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return internal_error("Failed to fetch user profile");
        }
    };

    let position = GeoPoint::new(req.latitude, req.longitude);
    let outcome = state.check_in.evaluate(&profile, position, chrono::Utc::now());
    let current_streak = profile.streak.unwrap_or(0);

    let response = match &outcome {
        CheckInOutcome::CheckedIn { update, distance_meters } => {
            if let Err(e) = state.appwrite.record_check_in(&profile, update).await {
                tracing::error!("Failed to record check-in for {}: {}", user_id, e);
                return internal_error("Failed to record check-in");
            }
            tracing::info!("User {} checked in ({:.0} m), streak {}", user_id, distance_meters, update.streak);
            CheckInResponse {
                status: outcome.status().to_string(),
                streak: update.streak,
                distance_meters: Some(*distance_meters),
            }
        }
        CheckInOutcome::TooFar { distance_meters } => CheckInResponse {
            status: outcome.status().to_string(),
            streak: current_streak,
            distance_meters: Some(*distance_meters),
        },
        _ => CheckInResponse {
            status: outcome.status().to_string(),
            streak: current_streak,
            distance_meters: None,
        },
    };

    tracing::debug!("Check-in for {}: {}", user_id, response.status);

    HttpResponse::Ok().json(response)
}
