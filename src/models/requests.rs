use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for the nearby endpoint
///
/// Both coordinates are optional; when neither is given the configured
/// fallback location is used.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Query for the filtered listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "device_id", rename = "deviceId")]
    pub device_id: String,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, alias = "favorites_only", rename = "favoritesOnly")]
    pub favorites_only: bool,
}

/// Query carrying only a device id
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeviceQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "device_id", rename = "deviceId")]
    pub device_id: String,
}

/// Request to toggle a venue in the favorites set
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ToggleFavoriteRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "device_id", rename = "deviceId")]
    pub device_id: String,
    #[validate(length(min = 1))]
    pub name: String,
}

/// Partial update of display preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "device_id", rename = "deviceId")]
    pub device_id: String,
    #[serde(default, alias = "dark_mode", rename = "darkMode")]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub language: Option<String>,
}
