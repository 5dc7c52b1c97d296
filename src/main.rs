use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use pizzeria_hotspots::config::{LoggingSettings, Settings};
use pizzeria_hotspots::core::{ProximityRanker, RatingSource, SeededSource, ThreadRngSource};
use pizzeria_hotspots::models::ErrorResponse;
use pizzeria_hotspots::routes::{self, AppState};
use pizzeria_hotspots::services::{ListingCache, ListingClient, SettingsStore, VenueCatalog};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for payload errors
#[derive(Debug)]
pub struct JsonError(ErrorResponse);

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    })
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError(ErrorResponse {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    })
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting Pizzeria Hotspots service...");

    let listing = ListingClient::new(
        settings.listing.url.clone(),
        settings.listing.timeout_secs.unwrap_or(10),
    )
    .map_err(|e| {
        error!("Failed to create listing client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let cache_ttl = settings.listing.cache_ttl_secs.unwrap_or(300);
    let cache = ListingCache::new(16, cache_ttl);

    info!("Listing client initialized ({}, TTL: {}s)", settings.listing.url, cache_ttl);

    let ratings: Arc<dyn RatingSource> = match settings.rating.seed {
        Some(seed) => {
            warn!("Using fixed rating seed {}", seed);
            Arc::new(SeededSource::new(seed))
        }
        None => Arc::new(ThreadRngSource),
    };

    let ranker = ProximityRanker::new(settings.ranking.nearest_limit);

    let catalog = Arc::new(VenueCatalog::new(
        listing,
        cache,
        ranker,
        ratings,
        settings.rating.bounds(),
    ));

    let store = match settings.database.url.as_deref() {
        Some(url) => SettingsStore::connect(
            url,
            settings.database.max_connections.unwrap_or(10),
            settings.database.min_connections.unwrap_or(1),
            settings.database.acquire_timeout_secs.unwrap_or(5),
            settings.database.idle_timeout_secs.unwrap_or(600),
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?,
        None => {
            warn!("No database configured, favorites and preferences are kept in memory");
            SettingsStore::in_memory()
        }
    };

    info!("Settings store initialized ({})", store.backend_name());

    let app_state = AppState {
        catalog,
        store: Arc::new(store),
        fallback: settings.ranking.fallback(),
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
