use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;
use crate::core::filter_venues;
use crate::models::{
    Coordinate, ListQuery, ListResponse, ListedVenue, LocationSource, NearbyQuery, NearbyResponse,
    VenueFilter,
};
use crate::routes::{error_response, AppState};
use crate::services::CatalogError;

/// Configure venue routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/pizzerias", web::get().to(list_pizzerias))
        .route("/pizzerias/nearby", web::get().to(nearby_pizzerias))
        .route("/pizzerias/refresh", web::post().to(refresh_pizzerias));
}

/// Nearby venues endpoint
///
/// GET /api/v1/pizzerias/nearby?latitude={lat}&longitude={lon}
///
/// Without coordinates the configured fallback location is used.
async fn nearby_pizzerias(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let (location, location_source) = match (query.latitude, query.longitude) {
        (Some(latitude), Some(longitude)) => {
            (Coordinate::new(latitude, longitude), LocationSource::Device)
        }
        (None, None) => (state.fallback, LocationSource::Fallback),
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                "latitude and longitude must be given together",
            );
        }
    };

    tracing::info!("Ranking pizzerias near {} ({:?})", location, location_source);

    match state.catalog.nearby(location).await {
        Ok(nearby) => {
            tracing::debug!(
                "Returning {} nearest of {} pizzerias",
                nearby.nearest.len(),
                nearby.all.len()
            );
            HttpResponse::Ok().json(NearbyResponse {
                location,
                location_source,
                all: nearby.all,
                nearest: nearby.nearest,
            })
        }
        Err(CatalogError::Rank(e)) => {
            tracing::info!("Rejected ranking input: {}", e);
            error_response(StatusCode::BAD_REQUEST, "Invalid coordinate", e)
        }
        Err(CatalogError::Listing(e)) => {
            tracing::error!("Failed to load venue listing: {}", e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to load venue listing", e)
        }
    }
}

/// Filtered listing endpoint
///
/// GET /api/v1/pizzerias?deviceId={id}&q={search}&favoritesOnly={bool}
async fn list_pizzerias(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let venues = match state.catalog.venues().await {
        Ok(venues) => venues,
        Err(e) => {
            tracing::error!("Failed to load venue listing: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, "Failed to load venue listing", e);
        }
    };

    let favorites = match state.store.load_favorites(&query.device_id).await {
        Ok(favorites) => favorites,
        Err(e) => {
            tracing::error!("Failed to load favorites for {}: {}", query.device_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load favorites", e);
        }
    };

    let filter = VenueFilter {
        query: query.q.clone().unwrap_or_default(),
        favorites_only: query.favorites_only,
    };

    let listed: Vec<ListedVenue> = filter_venues(&venues, &filter, &favorites)
        .into_iter()
        .map(|venue| ListedVenue::new(venue.clone(), favorites.contains(&venue.name)))
        .collect();

    tracing::debug!(
        "Listing {} of {} pizzerias for device {}",
        listed.len(),
        venues.len(),
        query.device_id
    );

    HttpResponse::Ok().json(ListResponse {
        total_results: listed.len(),
        venues: listed,
    })
}

/// Drop the cached listing and fetch it again
///
/// POST /api/v1/pizzerias/refresh
async fn refresh_pizzerias(state: web::Data<AppState>) -> impl Responder {
    state.catalog.invalidate().await;

    match state.catalog.venues().await {
        Ok(venues) => HttpResponse::Ok().json(json!({ "count": venues.len() })),
        Err(e) => {
            tracing::error!("Failed to refresh venue listing: {}", e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to load venue listing", e)
        }
    }
}
