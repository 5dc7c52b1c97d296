use crate::core::validate_coordinate;
use crate::models::Venue;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when fetching the venue listing
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Listing returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for the static hotspot listing
///
/// The listing is a JSON document of the form
/// `{"hotspots": [{"name": .., "latitude": .., "longitude": .., ...}]}`.
pub struct ListingClient {
    url: String,
    client: Client,
}

impl ListingClient {
    /// Create a new listing client
    pub fn new(url: String, timeout_secs: u64) -> Result<Self, ListingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every venue in the listing
    ///
    /// Entries that do not parse as a venue, or whose coordinates are out of
    /// range, are skipped.
    pub async fn fetch_venues(&self) -> Result<Vec<Venue>, ListingError> {
        tracing::debug!("Fetching venue listing from: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Venue listing request failed: {}", status);
            return Err(ListingError::ApiError(format!(
                "Failed to fetch listing: {}",
                status
            )));
        }

        let json: Value = response.json().await?;
        parse_listing(&json)
    }
}

/// Extract venues from a listing document
pub fn parse_listing(json: &Value) -> Result<Vec<Venue>, ListingError> {
    let hotspots = json
        .get("hotspots")
        .and_then(|h| h.as_array())
        .ok_or_else(|| ListingError::InvalidResponse("Missing hotspots array".into()))?;

    let venues: Vec<Venue> = hotspots
        .iter()
        .filter_map(|entry| match serde_json::from_value::<Venue>(entry.clone()) {
            Ok(venue) => match validate_coordinate(&venue.coordinate(), &venue.name) {
                Ok(()) => Some(venue),
                Err(e) => {
                    tracing::warn!("Skipping hotspot entry with bad coordinates: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Skipping malformed hotspot entry: {}", e);
                None
            }
        })
        .collect();

    tracing::debug!("Parsed {} of {} hotspot entries", venues.len(), hotspots.len());

    Ok(venues)
}
