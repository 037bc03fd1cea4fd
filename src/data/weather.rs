//! Open-Meteo weather API client
//!
//! This module fetches hourly forecast and archive data from Open-Meteo and
//! parses the column-oriented `hourly` block into [`WeatherDataPoint`]s.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{hourly_query, Coordinates, WeatherDataPoint, WeatherVariable};
use crate::config::Config;

/// Base URL for the Open-Meteo forecast API
pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Base URL for the Open-Meteo historical archive API
pub const OPEN_METEO_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Timezone used when none is configured
pub const DEFAULT_TIMEZONE: &str = "America/Argentina/Buenos_Aires";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed (connection error or timeout)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP status {0}")]
    HttpStatus(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

/// Client for fetching hourly data from the Open-Meteo forecast and archive APIs
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    forecast_url: String,
    archive_url: String,
    timezone: String,
    forecast_days: u8,
    forecast_timeout: Duration,
    archive_timeout: Duration,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    /// Create a new OpenMeteoClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            forecast_url: OPEN_METEO_FORECAST_URL.to_string(),
            archive_url: OPEN_METEO_ARCHIVE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            forecast_days: 2,
            forecast_timeout: Duration::from_secs(10),
            archive_timeout: Duration::from_secs(20),
        }
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_timezone(&config.timezone)
            .with_endpoints(&config.endpoints.forecast_url, &config.endpoints.archive_url)
            .with_timeouts(config.timeouts.forecast, config.timeouts.archive)
            .with_forecast_days(config.forecast_days)
    }

    /// Use a custom IANA timezone for returned timestamps
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Point the client at different forecast/archive endpoints
    pub fn with_endpoints(
        mut self,
        forecast_url: impl Into<String>,
        archive_url: impl Into<String>,
    ) -> Self {
        self.forecast_url = forecast_url.into();
        self.archive_url = archive_url.into();
        self
    }

    /// Per-request timeouts for forecast and archive calls
    pub fn with_timeouts(mut self, forecast: Duration, archive: Duration) -> Self {
        self.forecast_timeout = forecast;
        self.archive_timeout = archive;
        self
    }

    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days.max(1);
        self
    }

    /// Fetch hourly forecast data for the given coordinates
    ///
    /// Covers the previous day plus `forecast_days` days so that the hour
    /// before "now" is always present, including right after midnight.
    ///
    /// # Returns
    /// * `Ok(Vec<WeatherDataPoint>)` - Hourly points in upstream order
    /// * `Err(WeatherError)` - If the request, status or parsing fails
    pub async fn fetch_forecast(
        &self,
        coords: &Coordinates,
    ) -> Result<Vec<WeatherDataPoint>, WeatherError> {
        let hourly = hourly_query();
        let query = ForecastQuery {
            latitude: coords.latitude,
            longitude: coords.longitude,
            hourly: &hourly,
            timezone: &self.timezone,
            forecast_days: self.forecast_days,
            past_days: 1,
        };

        tracing::debug!(url = %self.forecast_url, ?query, "requesting forecast");

        let response = self
            .client
            .get(&self.forecast_url)
            .query(&query)
            .timeout(self.forecast_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let api_response: HourlyResponse = serde_json::from_str(&text)?;

        parse_response(api_response)
    }

    /// Fetch one calendar day of archived hourly data
    ///
    /// # Arguments
    /// * `coords` - Location to query
    /// * `date` - Day to fetch; used as both start and end date
    pub async fn fetch_archive_day(
        &self,
        coords: &Coordinates,
        date: NaiveDate,
    ) -> Result<Vec<WeatherDataPoint>, WeatherError> {
        let hourly = hourly_query();
        let day = date.format("%Y-%m-%d").to_string();
        let query = ArchiveQuery {
            latitude: coords.latitude,
            longitude: coords.longitude,
            start_date: &day,
            end_date: &day,
            hourly: &hourly,
            timezone: &self.timezone,
        };

        tracing::debug!(url = %self.archive_url, ?query, "requesting archive day");

        let response = self
            .client
            .get(&self.archive_url)
            .query(&query)
            .timeout(self.archive_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let api_response: HourlyResponse = serde_json::from_str(&text)?;

        parse_response(api_response)
    }
}

/// Parse an Open-Meteo response into hourly data points
fn parse_response(response: HourlyResponse) -> Result<Vec<WeatherDataPoint>, WeatherError> {
    let hourly = response
        .hourly
        .ok_or_else(|| WeatherError::MissingField("hourly".to_string()))?;

    parse_hourly_data(&hourly)
}

/// Parse hourly weather data arrays into WeatherDataPoint structs
///
/// Variable columns that are absent, shorter than `time`, or hold `null`
/// produce `None` for the affected hours.
fn parse_hourly_data(hourly: &HourlyWeather) -> Result<Vec<WeatherDataPoint>, WeatherError> {
    let len = hourly.time.len();

    for variable in WeatherVariable::all() {
        if let Some(column) = hourly.column(*variable) {
            if column.len() != len {
                tracing::debug!(
                    variable = variable.api_name(),
                    expected = len,
                    actual = column.len(),
                    "hourly column length mismatch"
                );
            }
        }
    }

    let mut points = Vec::with_capacity(len);

    for (i, raw_time) in hourly.time.iter().enumerate() {
        let mut point = WeatherDataPoint::new(parse_datetime(raw_time)?);
        for variable in WeatherVariable::all() {
            let value = hourly
                .column(*variable)
                .and_then(|column| column.get(i).copied().flatten())
                .filter(|v| v.is_finite());
            point.set_value(*variable, value);
        }
        points.push(point);
    }

    Ok(points)
}

/// Parse a datetime string in ISO 8601 format (e.g., "2024-07-15T05:00") to NaiveDateTime
fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M")
        .map_err(|_| WeatherError::InvalidTimeFormat(datetime_str.to_string()))
}

/// Query parameters for the forecast endpoint
#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    hourly: &'a str,
    timezone: &'a str,
    forecast_days: u8,
    past_days: u8,
}

/// Query parameters for the archive endpoint
#[derive(Debug, Serialize)]
struct ArchiveQuery<'a> {
    latitude: f64,
    longitude: f64,
    start_date: &'a str,
    end_date: &'a str,
    hourly: &'a str,
    timezone: &'a str,
}

/// Open-Meteo response structure (forecast and archive share it)
#[derive(Debug, Deserialize)]
struct HourlyResponse {
    hourly: Option<HourlyWeather>,
}

/// Hourly weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct HourlyWeather {
    time: Vec<String>,
    temperature_2m: Option<Vec<Option<f64>>>,
    relative_humidity_2m: Option<Vec<Option<f64>>>,
    precipitation: Option<Vec<Option<f64>>>,
    wind_speed_10m: Option<Vec<Option<f64>>>,
}

impl HourlyWeather {
    fn column(&self, variable: WeatherVariable) -> Option<&Vec<Option<f64>>> {
        match variable {
            WeatherVariable::Temperature => self.temperature_2m.as_ref(),
            WeatherVariable::RelativeHumidity => self.relative_humidity_2m.as_ref(),
            WeatherVariable::Precipitation => self.precipitation.as_ref(),
            WeatherVariable::WindSpeed => self.wind_speed_10m.as_ref(),
        }
    }
}
