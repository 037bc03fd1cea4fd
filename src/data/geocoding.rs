//! Place-name search backed by Nominatim (OpenStreetMap)
//!
//! Nominatim requires an identifying `User-Agent` and returns coordinates as
//! strings, so results are parsed and reshaped into [`GeocodedPlace`]s.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Coordinates;
use crate::config::Config;

/// Base URL for the Nominatim search API
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Identifying client header required by Nominatim's usage policy
pub const USER_AGENT: &str = concat!("QueMePongo/", env!("CARGO_PKG_VERSION"));

/// Maximum number of candidates returned for a search
pub const MAX_RESULTS: usize = 5;

/// Errors that can occur when geocoding a place name
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// The search text was empty or whitespace
    #[error("Missing place name to search for")]
    EmptyQuery,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Geocoding service returned HTTP status {0}")]
    HttpStatus(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One geocoding candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    /// Upstream place identifier
    pub id: u64,
    /// Full display name
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodedPlace {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Client for searching places by free text
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodingClient {
    /// Creates a new GeocodingClient with default configuration
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
            base_url: NOMINATIM_SEARCH_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_base_url(&config.endpoints.geocoding_url)
            .with_timeout(config.timeouts.geocoding)
    }

    /// Creates a client pointed at a custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Searches for places matching `name`
    ///
    /// # Returns
    /// * `Ok(Vec<GeocodedPlace>)` - Up to five candidates in upstream ranking order
    /// * `Err(GeocodingError)` - If the query is empty or the request fails
    pub async fn search(&self, name: &str) -> Result<Vec<GeocodedPlace>, GeocodingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GeocodingError::EmptyQuery);
        }

        let limit = MAX_RESULTS.to_string();
        tracing::debug!(url = %self.base_url, query = name, "searching places");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("q", name), ("format", "json"), ("limit", limit.as_str())])
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let results: Vec<NominatimResult> = serde_json::from_str(&text)?;
        let places = format_results(results);

        tracing::info!(query = name, candidates = places.len(), "geocoded place name");
        Ok(places)
    }
}

/// Convert raw Nominatim results into places, skipping unparseable coordinates
fn format_results(results: Vec<NominatimResult>) -> Vec<GeocodedPlace> {
    results
        .into_iter()
        .filter_map(|result| {
            let latitude = result.lat.trim().parse::<f64>().ok()?;
            let longitude = result.lon.trim().parse::<f64>().ok()?;
            let place = GeocodedPlace {
                id: result.place_id,
                name: result.display_name,
                latitude,
                longitude,
            };
            if place.coordinates().validate().is_err() {
                tracing::debug!(id = place.id, "skipping place with out-of-range coordinates");
                return None;
            }
            Some(place)
        })
        .take(MAX_RESULTS)
        .collect()
}

/// Nominatim search result (only the fields we use)
#[derive(Debug, Deserialize)]
struct NominatimResult {
    place_id: u64,
    lat: String,
    lon: String,
    display_name: String,
}
