//! Projection pipeline: multi-year archive fetch, averaging and re-dating
//!
//! For each of the previous `history_years` years the archive is asked for
//! today's month/day. Successful years are averaged per hour index and the
//! result is laid onto the window around "now".

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use futures::future::join_all;

use super::averaging::average_samples;
use super::calendar::reconstruct;
use crate::data::{
    Coordinates, HistoricalYearSample, OpenMeteoClient, WeatherDataPoint, WeatherError,
};
use crate::error::PipelineError;

/// Upper bound on archive years fetched per request
pub const MAX_HISTORY_YEARS: u8 = 10;

/// Upper bound on hours projected past the current hour
pub const MAX_HOURS_AHEAD: u32 = 48;

/// How the per-year archive requests are issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// All years in flight at once
    #[default]
    Concurrent,
    /// One year after another, most recent first
    Sequential,
}

/// Knobs for the projection pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Number of prior years to average (clamped to 1..=10)
    pub history_years: u8,
    pub fetch_mode: FetchMode,
    /// Return the raw averaged series when re-dating leaves too few hours
    pub calendar_fallback: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            history_years: MAX_HISTORY_YEARS,
            fetch_mode: FetchMode::Concurrent,
            calendar_fallback: true,
        }
    }
}

impl ProjectionConfig {
    /// Year count actually used, always within 1..=MAX_HISTORY_YEARS
    pub fn effective_years(&self) -> u8 {
        self.history_years.clamp(1, MAX_HISTORY_YEARS)
    }
}

/// Today's month/day in each of the `years` previous years, most recent first.
///
/// February 29 maps to February 28 in years without one.
pub fn target_dates(today: NaiveDate, years: u8) -> Vec<NaiveDate> {
    (1..=i32::from(years))
        .filter_map(|back| {
            let year = today.year() - back;
            NaiveDate::from_ymd_opt(year, today.month(), today.day())
                .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
        })
        .collect()
}

/// Fetches one archive day per date, dropping and logging the failures.
///
/// A response without hourly points counts as a failure. Successful samples
/// keep the order of `dates` regardless of completion order.
pub async fn fetch_history(
    client: &OpenMeteoClient,
    coords: &Coordinates,
    dates: &[NaiveDate],
    mode: FetchMode,
) -> Vec<HistoricalYearSample> {
    let results = match mode {
        FetchMode::Concurrent => {
            join_all(dates.iter().map(|date| client.fetch_archive_day(coords, *date))).await
        }
        FetchMode::Sequential => {
            let mut results = Vec::with_capacity(dates.len());
            for date in dates {
                results.push(client.fetch_archive_day(coords, *date).await);
            }
            results
        }
    };

    dates
        .iter()
        .zip(results)
        .filter_map(|(date, result)| keep_year(*date, result))
        .collect()
}

fn keep_year(
    date: NaiveDate,
    result: Result<Vec<WeatherDataPoint>, WeatherError>,
) -> Option<HistoricalYearSample> {
    match result {
        Ok(points) if points.is_empty() => {
            tracing::warn!(year = date.year(), "archive returned no hourly points; excluding year");
            None
        }
        Ok(points) => {
            tracing::info!(year = date.year(), points = points.len(), "archive year loaded");
            Some(HistoricalYearSample { date, points })
        }
        Err(err) => {
            tracing::warn!(year = date.year(), error = %err, "archive request failed; excluding year");
            None
        }
    }
}

/// Builds the historical projection for the window around `now`.
///
/// # Errors
/// * precondition failures for invalid coordinates or `hours_ahead` outside
///   1..=48, before any request
/// * [`PipelineError::NoHistoricalData`] when every archive year failed
/// * [`PipelineError::NoHourlyData`] when the averaged series is empty
pub async fn get_projection_data(
    client: &OpenMeteoClient,
    coords: &Coordinates,
    hours_ahead: u32,
    now: NaiveDateTime,
    config: &ProjectionConfig,
) -> Result<Vec<WeatherDataPoint>, PipelineError> {
    coords.validate()?;
    if !(1..=MAX_HOURS_AHEAD).contains(&hours_ahead) {
        return Err(PipelineError::InvalidHoursAhead {
            hours: hours_ahead,
            max: MAX_HOURS_AHEAD,
        });
    }

    let dates = target_dates(now.date(), config.effective_years());
    let samples = fetch_history(client, coords, &dates, config.fetch_mode).await;

    if samples.is_empty() {
        return Err(PipelineError::NoHistoricalData {
            attempted: dates.len(),
        });
    }
    tracing::info!(
        succeeded = samples.len(),
        attempted = dates.len(),
        "historical years collected"
    );

    let averaged = average_samples(&samples);
    if averaged.is_empty() {
        return Err(PipelineError::NoHourlyData);
    }

    Ok(reconstruct(&averaged, now, hours_ahead, config.calendar_fallback))
}
