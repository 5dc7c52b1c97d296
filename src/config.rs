use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::validate_coordinate;
use crate::models::{Coordinate, RatingBounds};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub listing: ListingSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub rating: RatingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingSettings {
    pub url: String,
    pub timeout_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
}

/// Database settings; without a URL settings are kept in memory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_nearest_limit")]
    pub nearest_limit: usize,
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,
    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            nearest_limit: default_nearest_limit(),
            fallback_latitude: default_fallback_latitude(),
            fallback_longitude: default_fallback_longitude(),
        }
    }
}

impl RankingSettings {
    pub fn fallback(&self) -> Coordinate {
        Coordinate::new(self.fallback_latitude, self.fallback_longitude)
    }
}

fn default_nearest_limit() -> usize { 3 }
fn default_fallback_latitude() -> f64 { Coordinate::FALLBACK.latitude }
fn default_fallback_longitude() -> f64 { Coordinate::FALLBACK.longitude }

#[derive(Debug, Clone, Deserialize)]
pub struct RatingSettings {
    #[serde(default = "default_rating_min")]
    pub min: f64,
    #[serde(default = "default_rating_max")]
    pub max: f64,
    /// Fixed seed for reproducible ratings
    pub seed: Option<u64>,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            min: default_rating_min(),
            max: default_rating_max(),
            seed: None,
        }
    }
}

impl RatingSettings {
    pub fn bounds(&self) -> RatingBounds {
        RatingBounds {
            min: self.min,
            max: self.max,
        }
    }
}

fn default_rating_min() -> f64 { 3.5 }
fn default_rating_max() -> f64 { 5.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with HOTSPOTS__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., HOTSPOTS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("HOTSPOTS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_database_url(settings)?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("HOTSPOTS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would only fail later, at request time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rating = &self.rating;
        if !(rating.min.is_finite() && rating.max.is_finite()) || rating.min >= rating.max {
            return Err(ConfigError::Message(format!(
                "rating bounds must be finite with min < max, got [{}, {})",
                rating.min, rating.max
            )));
        }

        if self.ranking.nearest_limit == 0 {
            return Err(ConfigError::Message("ranking.nearest_limit must be at least 1".into()));
        }

        validate_coordinate(&self.ranking.fallback(), "ranking fallback")
            .map_err(|e| ConfigError::Message(e.to_string()))
    }
}

/// Honour the conventional DATABASE_URL variable when set
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        _ => Ok(settings),
    }
}
