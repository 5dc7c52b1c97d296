use serde::{Deserialize, Serialize};
use crate::models::domain::{AppPreferences, Coordinate, LocationSource, Venue};

/// A ranked venue as shown on the home screen
#[derive(Debug, Clone, Serialize)]
pub struct NearbyVenue {
    #[serde(flatten)]
    pub venue: Venue,
    /// Kilometres, one decimal
    pub distance: f64,
    pub rating: f64,
}

impl NearbyVenue {
    /// Listing fields named `distance` or `rating` are dropped so the
    /// computed values are the only ones serialized.
    pub fn new(mut venue: Venue, distance: f64, rating: f64) -> Self {
        venue.extra.remove("distance");
        venue.extra.remove("rating");
        Self { venue, distance, rating }
    }
}

/// Response for the nearby endpoint
#[derive(Debug, Clone, Serialize)]
pub struct NearbyResponse {
    pub location: Coordinate,
    #[serde(rename = "locationSource")]
    pub location_source: LocationSource,
    pub all: Vec<NearbyVenue>,
    pub nearest: Vec<NearbyVenue>,
}

/// A listing entry with the device's favorite flag
#[derive(Debug, Clone, Serialize)]
pub struct ListedVenue {
    #[serde(flatten)]
    pub venue: Venue,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}

impl ListedVenue {
    pub fn new(mut venue: Venue, is_favorite: bool) -> Self {
        venue.extra.remove("isFavorite");
        Self { venue, is_favorite }
    }
}

/// Response for the filtered listing
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub venues: Vec<ListedVenue>,
    pub total_results: usize,
}

/// Response for favorites queries and toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub favorites: Vec<String>,
}

/// Response for preference queries and updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(flatten)]
    pub preferences: AppPreferences,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
