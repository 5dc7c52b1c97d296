// Route exports
pub mod devices;
pub mod pizzerias;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use crate::models::{Coordinate, ErrorResponse, HealthResponse};
use crate::services::{SettingsStore, VenueCatalog};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<VenueCatalog>,
    pub store: Arc<SettingsStore>,
    /// Used when the caller does not supply a location
    pub fallback: Coordinate,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(pizzerias::configure)
            .configure(devices::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Build the JSON error envelope
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}
