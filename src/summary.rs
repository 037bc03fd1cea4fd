//! Per-hour comparison of projection against forecast

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::data::{WeatherDataPoint, WeatherVariable};
use crate::pipeline::averaging::round2;

/// One row of the summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(serialize_with = "serialize_time")]
    pub time: NaiveDateTime,
    pub forecast: Option<f64>,
    pub projection: Option<f64>,
}

impl SummaryRow {
    /// `projection - forecast`, only when both are present
    pub fn difference(&self) -> Option<f64> {
        match (self.projection, self.forecast) {
            (Some(projection), Some(forecast)) => Some(round2(projection - forecast)),
            _ => None,
        }
    }
}

/// One row per projection point, paired with the first forecast point
/// sharing its hour of day.
pub fn summarize(
    forecast: &[WeatherDataPoint],
    projection: &[WeatherDataPoint],
    variable: WeatherVariable,
) -> Vec<SummaryRow> {
    projection
        .iter()
        .map(|point| SummaryRow {
            time: point.time,
            forecast: forecast
                .iter()
                .find(|f| f.hour() == point.hour())
                .and_then(|f| f.value(variable)),
            projection: point.value(variable),
        })
        .collect()
}

/// Value with unit and fixed precision, `--` when missing
pub fn format_value(value: Option<f64>, unit: &str, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => "--".to_string(),
    }
}

/// Signed difference, `--` when missing
pub fn format_difference(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:+.1}{}", v, unit),
        None => "--".to_string(),
    }
}

fn serialize_time<S: serde::Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format("%Y-%m-%dT%H:%M").to_string())
}
