use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use spotter::auth::IdentityVerifier;
use spotter::config::{LoggingSettings, Settings};
use spotter::core::Matcher;
use spotter::routes::{self, AppState};
use spotter::services::{AppwriteClient, AppwriteCollections, WebhookClient};
use std::io;
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spotter={},actix_web=info", logging.level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(startup_error(e));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Spotter matching service...");

    if settings.auth.jwt_secret.is_empty() {
        error!("auth.jwt_secret is empty, refusing to start");
        return Err(startup_error("auth.jwt_secret must be set"));
    }

    let check_in = settings.check_in.policy().map_err(|e| {
        error!("Invalid check-in settings: {}", e);
        startup_error(e)
    })?;

    let appwrite_collections = AppwriteCollections {
        user_profiles: settings.collection.user_profiles,
        swipes: settings.collection.swipes,
        matches: settings.collection.matches,
    };

    let appwrite = AppwriteClient::new(
        settings.appwrite.endpoint,
        settings.appwrite.api_key,
        settings.appwrite.project_id,
        settings.appwrite.database_id,
        appwrite_collections,
        settings.matching.page_size,
    )
    .map_err(startup_error)?;

    info!("Appwrite client initialized");

    let webhook = WebhookClient::new(settings.webhook.suggestions_url, settings.webhook.timeout_secs)
        .map_err(startup_error)?;

    if !webhook.is_configured() {
        info!("No suggestion webhook configured, /suggestions will answer 503");
    }

    let matcher = Matcher::new(settings.matching.nearby_radius_km);

    info!("Matcher initialized with nearby radius {} km", matcher.nearby_radius_km());

    let app_state = AppState {
        appwrite: Arc::new(appwrite),
        webhook: Arc::new(webhook),
        identity: IdentityVerifier::new(&settings.auth.jwt_secret),
        matcher,
        check_in,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
