//! Error types for the forecast and projection pipelines

use thiserror::Error;

use crate::data::WeatherError;

/// Errors surfaced by the pipelines to the presentation layer
///
/// Partial upstream failures (a single archive year) never show up here; they
/// are logged and the year is excluded.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Latitude or longitude was not provided
    #[error("Missing coordinates: latitude and longitude are both required")]
    MissingCoordinates,

    /// Coordinates are not finite or out of geographic range
    #[error("Invalid coordinates: latitude={latitude}, longitude={longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Projection window outside the supported range
    #[error("Invalid hours ahead: {hours} (expected 1..={max})")]
    InvalidHoursAhead { hours: u32, max: u32 },

    /// The forecast request itself failed
    #[error("Forecast request failed: {0}")]
    Forecast(#[source] WeatherError),

    /// The forecast response held no hourly points
    #[error("No hourly forecast data received")]
    NoForecastData,

    /// Every archive year failed
    #[error("No historical data available: all {attempted} archive years failed")]
    NoHistoricalData { attempted: usize },

    /// Archive years succeeded but produced nothing to project
    #[error("Historical data contained no usable hourly points")]
    NoHourlyData,
}

impl PipelineError {
    /// Whether the request was rejected before any network call
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingCoordinates
                | PipelineError::InvalidCoordinates { .. }
                | PipelineError::InvalidHoursAhead { .. }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::MissingCoordinates | PipelineError::InvalidCoordinates { .. } => {
                "Select a location before loading weather data.".to_string()
            }
            PipelineError::InvalidHoursAhead { max, .. } => {
                format!("Choose between 1 and {} projection hours.", max)
            }
            PipelineError::Forecast(_) | PipelineError::NoForecastData => {
                "Unable to load the forecast. Check your connection and try again.".to_string()
            }
            PipelineError::NoHistoricalData { .. } | PipelineError::NoHourlyData => {
                "Unable to load historical data for the projection. Try again later.".to_string()
            }
        }
    }
}
