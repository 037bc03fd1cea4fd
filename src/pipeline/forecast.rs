//! Forecast pipeline: fetch ~48 hours and trim to the dashboard window

use chrono::{NaiveDateTime, Timelike};

use super::calendar::add_hours;
use crate::data::{Coordinates, OpenMeteoClient, WeatherDataPoint};
use crate::error::PipelineError;

/// Hour of day the window starts at: one hour before `current_hour`, wrapping at midnight
pub fn start_hour(current_hour: u32) -> u32 {
    (current_hour % 24 + 23) % 24
}

/// Drops forecast points before the hour preceding `now`.
///
/// The point stamped exactly one hour before the current hour is preferred;
/// failing that, the first point with the start hour of day. When neither
/// exists the sequence is returned unchanged rather than emptied.
pub fn trim_forecast_window(
    points: Vec<WeatherDataPoint>,
    now: NaiveDateTime,
) -> Vec<WeatherDataPoint> {
    let anchor = add_hours(now.date(), now.hour(), -1)
        .and_then(|(date, hour)| date.and_hms_opt(hour, 0, 0));
    let start = start_hour(now.hour());

    let position = anchor
        .and_then(|anchor| points.iter().position(|p| p.time == anchor))
        .or_else(|| points.iter().position(|p| p.hour() == start));

    match position {
        Some(index) => points.into_iter().skip(index).collect(),
        None => {
            tracing::debug!(start, "no forecast point at window start; keeping full sequence");
            points
        }
    }
}

/// Fetches the forecast for `coords` and trims it to start one hour before `now`.
///
/// # Errors
/// * precondition failures for invalid coordinates, before any request
/// * [`PipelineError::Forecast`] when the upstream call fails
/// * [`PipelineError::NoForecastData`] when upstream returns no hours
pub async fn get_forecast_data(
    client: &OpenMeteoClient,
    coords: &Coordinates,
    now: NaiveDateTime,
) -> Result<Vec<WeatherDataPoint>, PipelineError> {
    coords.validate()?;

    let points = client
        .fetch_forecast(coords)
        .await
        .map_err(PipelineError::Forecast)?;

    if points.is_empty() {
        return Err(PipelineError::NoForecastData);
    }

    let trimmed = trim_forecast_window(points, now);
    tracing::info!(points = trimmed.len(), "forecast loaded");
    Ok(trimmed)
}
