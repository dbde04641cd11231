use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::core::build_exclusion_set;
use crate::models::{
    ErrorResponse, HealthResponse, Match, PartnersResponse, Swipe, SwipeAction, SwipeRequest, SwipeResponse,
};
use crate::routes::{internal_error, missing_identity, unauthorized, AppState};

/// Configure partner discovery and swipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/partners", web::get().to(find_partners))
        .route("/swipes", web::post().to(record_swipe));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find gym partners endpoint
///
/// GET /api/v1/partners
///
/// Headers: `Authorization: Bearer <session token>`
///
/// Response body:
/// ```json
/// { "profiles": [UserProfile] }
/// ```
async fn find_partners(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let viewer_id = match state.identity.viewer_id(&http_req) {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::debug!("No viewer identity on partners request, returning empty list");
            return HttpResponse::Ok().json(PartnersResponse { profiles: vec![] });
        }
        Err(e) => {
            tracing::info!("Rejected partners request: {}", e);
            return unauthorized(&e);
        }
    };

    tracing::info!("Finding partners for user: {}", viewer_id);

    // Independent reads, no isolation between them
    let reads = tokio::try_join!(
        state.appwrite.list_profiles(),
        state.appwrite.list_matches(&viewer_id),
        state.appwrite.list_swipes_by(&viewer_id),
    );

    let (profiles, matches, swipes) = match reads {
        Ok(reads) => reads,
        Err(e) => {
            tracing::error!("Failed to load partner data for {}: {}", viewer_id, e);
            return internal_error("Failed to fetch partners");
        }
    };

    let excluded = build_exclusion_set(&viewer_id, &matches, &swipes);

    let viewer = profiles.iter().find(|p| p.user_id == viewer_id).cloned();
    if viewer.is_none() {
        tracing::warn!("Profile for {} not found, returning untiered candidates", viewer_id);
    }

    let result = state.matcher.find_partners(viewer.as_ref(), profiles, &excluded);

    tracing::info!(
        "Returning {} partners for user {} (from {} profiles; gym={}, nearby={}, city={}, tiered={})",
        result.profiles.len(),
        viewer_id,
        result.total_candidates,
        result.same_gym,
        result.nearby,
        result.same_city,
        result.tiered
    );

    HttpResponse::Ok().json(PartnersResponse { profiles: result.profiles })
}

/// Record swipe endpoint
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "targetId": "string",
///   "action": "like|pass"
/// }
/// ```
///
/// A like answering an earlier like from the target creates a match.
async fn record_swipe(
    state: web::Data<AppState>,
    req: web::Json<SwipeRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let viewer_id = match state.identity.viewer_id(&http_req) {
        Ok(Some(id)) => id,
        Ok(None) => return missing_identity(),
        Err(e) => return unauthorized(&e),
    };

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(400, "Validation failed", errors.to_string()));
    }

    if req.target_id == viewer_id {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            400,
            "Invalid target",
            "Cannot swipe on your own profile",
        ));
    }

    let swipe = Swipe {
        swiper_id: viewer_id.clone(),
        target_id: req.target_id.clone(),
        action: req.action,
        created_at: chrono::Utc::now(),
    };

    let swipe_id = match state.appwrite.record_swipe(&swipe).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to record swipe {} -> {}: {}", viewer_id, req.target_id, e);
            return internal_error("Failed to record swipe");
        }
    };

    let mut matched = false;
    if swipe.action == SwipeAction::Like {
        match state.appwrite.has_liked(&req.target_id, &viewer_id).await {
            Ok(true) => {
                let existing = match state.appwrite.list_matches(&viewer_id).await {
                    Ok(matches) => matches,
                    Err(e) => {
                        tracing::error!("Failed to load matches for {}: {}", viewer_id, e);
                        return internal_error("Failed to create match");
                    }
                };

                // A repeated like on an existing partner must not pair them twice
                if already_matched(&existing, &viewer_id, &req.target_id) {
                    tracing::debug!("{} and {} are already matched", viewer_id, req.target_id);
                } else {
                    let m = Match::between(&viewer_id, &req.target_id);
                    match state.appwrite.create_match(&m).await {
                        Ok(_) => {
                            matched = true;
                            tracing::info!("New match: {} <-> {}", viewer_id, req.target_id);
                        }
                        Err(e) => {
                            tracing::error!("Failed to create match {} <-> {}: {}", viewer_id, req.target_id, e);
                            return internal_error("Failed to create match");
                        }
                    }
                }
            }
            Ok(false) => {}
            Err(e) => {
                // The swipe itself is stored; a later like from the target will pair them up
                tracing::warn!("Could not check reciprocal like for {} -> {}: {}", viewer_id, req.target_id, e);
            }
        }
    }

    HttpResponse::Ok().json(SwipeResponse { swipe_id, matched })
}

/// Whether `user_id` and `target_id` already share a match
fn already_matched(matches: &[Match], user_id: &str, target_id: &str) -> bool {
    matches.iter().any(|m| m.others(user_id).any(|id| id == target_id))
}
