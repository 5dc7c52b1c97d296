use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A pizzeria from the remote hotspot listing
///
/// `name` is the unique key. Fields the listing carries beyond the ones
/// modelled here are kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Venue {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            description: None,
            city: None,
            province: None,
            extra: Map::new(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Geographic centre of the Netherlands, used when the user's position
    /// cannot be resolved.
    pub const FALLBACK: Coordinate = Coordinate {
        latitude: 52.1326,
        longitude: 5.2913,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Where the coordinate used for ranking came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Device,
    Fallback,
}

/// A venue annotated with its great-circle distance from the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVenue {
    #[serde(flatten)]
    pub venue: Venue,
    /// Full-precision distance; ranking is done on this value.
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    /// Position of the venue in the ranker's input.
    #[serde(skip)]
    pub position: usize,
}

impl RankedVenue {
    /// Distance rounded to one decimal place for display
    pub fn display_distance(&self) -> f64 {
        round_one_decimal(self.distance_km)
    }
}

/// Round to one decimal place
#[inline]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Names of the venues a device marked as favorite
///
/// Behaves as a set; toggling a name on appends it, so the stored order is
/// the order in which favorites were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesSet(Vec<String>);

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Flip membership of `name`. Returns true if it is now a favorite.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(idx) = self.0.iter().position(|n| n == name) {
            self.0.remove(idx);
            false
        } else {
            self.0.push(name.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl FromIterator<String> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = FavoritesSet::new();
        for name in iter {
            if !set.contains(&name) {
                set.0.push(name);
            }
        }
        set
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),
}

/// Interface languages the app ships translations for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Nl,
    De,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Nl => "nl",
            Language::De => "de",
        }
    }
}

impl FromStr for Language {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "nl" => Ok(Language::Nl),
            "de" => Ok(Language::De),
            _ => Err(PreferenceError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Per-device display preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(rename = "darkMode")]
    pub dark_mode: bool,
    pub language: Language,
}

/// Search and favorites filter applied to the listing
#[derive(Debug, Clone, Default)]
pub struct VenueFilter {
    pub query: String,
    pub favorites_only: bool,
}

/// Inclusive lower / exclusive upper bound for synthesized ratings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingBounds {
    fn default() -> Self {
        Self { min: 3.5, max: 5.0 }
    }
}
