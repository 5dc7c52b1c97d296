use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    DeviceQuery, FavoritesResponse, Language, PreferencesResponse, ToggleFavoriteRequest,
    UpdatePreferencesRequest,
};
use crate::routes::{error_response, AppState};

/// Configure favorites and preference routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/favorites", web::get().to(get_favorites))
        .route("/favorites/toggle", web::post().to(toggle_favorite))
        .route("/preferences", web::get().to(get_preferences))
        .route("/preferences", web::put().to(update_preferences));
}

/// GET /api/v1/favorites?deviceId={id}
async fn get_favorites(
    state: web::Data<AppState>,
    query: web::Query<DeviceQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match state.store.load_favorites(&query.device_id).await {
        Ok(favorites) => HttpResponse::Ok().json(FavoritesResponse {
            device_id: query.device_id.clone(),
            favorites: favorites.names().to_vec(),
        }),
        Err(e) => {
            tracing::error!("Failed to load favorites for {}: {}", query.device_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load favorites", e)
        }
    }
}

/// Toggle a venue in the favorites set
///
/// POST /api/v1/favorites/toggle
///
/// Request body:
/// ```json
/// { "deviceId": "string", "name": "string" }
/// ```
async fn toggle_favorite(
    state: web::Data<AppState>,
    req: web::Json<ToggleFavoriteRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match state.store.toggle_favorite(&req.device_id, &req.name).await {
        Ok(favorites) => HttpResponse::Ok().json(FavoritesResponse {
            device_id: req.device_id.clone(),
            favorites: favorites.names().to_vec(),
        }),
        Err(e) => {
            tracing::error!("Could not save favorites for {}: {}", req.device_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save favorites", e)
        }
    }
}

/// GET /api/v1/preferences?deviceId={id}
async fn get_preferences(
    state: web::Data<AppState>,
    query: web::Query<DeviceQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match state.store.load_preferences(&query.device_id).await {
        Ok(preferences) => HttpResponse::Ok().json(PreferencesResponse {
            device_id: query.device_id.clone(),
            preferences,
        }),
        Err(e) => {
            tracing::error!("Failed to load preferences for {}: {}", query.device_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load preferences", e)
        }
    }
}

/// Update dark mode and/or language
///
/// PUT /api/v1/preferences
///
/// Request body:
/// ```json
/// { "deviceId": "string", "darkMode": true, "language": "en|nl|de" }
/// ```
async fn update_preferences(
    state: web::Data<AppState>,
    req: web::Json<UpdatePreferencesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    // Reject unknown languages before touching storage
    let language = match req.language.as_deref().map(str::parse::<Language>).transpose() {
        Ok(language) => language,
        Err(e) => {
            tracing::info!("Invalid language code from {}: {}", req.device_id, e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid language", e);
        }
    };

    let mut preferences = match state.store.load_preferences(&req.device_id).await {
        Ok(preferences) => preferences,
        Err(e) => {
            tracing::error!("Failed to load preferences for {}: {}", req.device_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load preferences", e);
        }
    };

    if let Some(dark_mode) = req.dark_mode {
        preferences.dark_mode = dark_mode;
    }
    if let Some(language) = language {
        preferences.language = language;
    }

    match state.store.save_preferences(&req.device_id, &preferences).await {
        Ok(()) => HttpResponse::Ok().json(PreferencesResponse {
            device_id: req.device_id.clone(),
            preferences,
        }),
        Err(e) => {
            tracing::error!("Could not save preferences for {}: {}", req.device_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save preferences", e)
        }
    }
}
