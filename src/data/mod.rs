//! Core data models for the weather dashboard
//!
//! This module contains the hourly data point type shared by the forecast and
//! projection pipelines, the tracked weather variables, and the upstream
//! clients that produce them.

pub mod geocoding;
pub mod weather;

pub use geocoding::{GeocodedPlace, GeocodingClient, GeocodingError};
pub use weather::{OpenMeteoClient, WeatherError};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Hourly variables requested from Open-Meteo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherVariable {
    /// Air temperature at 2 meters
    Temperature,
    /// Relative humidity at 2 meters
    RelativeHumidity,
    /// Total precipitation of the preceding hour
    Precipitation,
    /// Wind speed at 10 meters
    WindSpeed,
}

impl WeatherVariable {
    /// Returns a slice containing all variable variants.
    pub fn all() -> &'static [WeatherVariable] {
        &[
            WeatherVariable::Temperature,
            WeatherVariable::RelativeHumidity,
            WeatherVariable::Precipitation,
            WeatherVariable::WindSpeed,
        ]
    }

    /// Name of the hourly variable in Open-Meteo queries and responses
    pub fn api_name(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "temperature_2m",
            WeatherVariable::RelativeHumidity => "relative_humidity_2m",
            WeatherVariable::Precipitation => "precipitation",
            WeatherVariable::WindSpeed => "wind_speed_10m",
        }
    }

    /// Returns a human-readable display label for the variable.
    pub fn label(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "Temperature",
            WeatherVariable::RelativeHumidity => "Humidity",
            WeatherVariable::Precipitation => "Precipitation",
            WeatherVariable::WindSpeed => "Wind speed",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "°C",
            WeatherVariable::RelativeHumidity => "%",
            WeatherVariable::Precipitation => "mm",
            WeatherVariable::WindSpeed => "km/h",
        }
    }

    /// Parses user input into a WeatherVariable.
    ///
    /// Matching is case-insensitive and accepts the Open-Meteo names as well
    /// as short aliases:
    /// - "temperature" | "temp" | "temperature_2m" -> Temperature
    /// - "humidity" | "relative_humidity_2m" -> RelativeHumidity
    /// - "precipitation" | "rain" -> Precipitation
    /// - "wind" | "wind_speed_10m" -> WindSpeed
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<WeatherVariable> {
        match s.to_lowercase().trim() {
            "temperature" | "temp" | "temperature_2m" => Some(WeatherVariable::Temperature),
            "humidity" | "relative_humidity" | "relative_humidity_2m" => {
                Some(WeatherVariable::RelativeHumidity)
            }
            "precipitation" | "rain" => Some(WeatherVariable::Precipitation),
            "wind" | "wind_speed" | "wind_speed_10m" => Some(WeatherVariable::WindSpeed),
            _ => None,
        }
    }
}

/// Comma-separated hourly variable list for Open-Meteo queries
pub fn hourly_query() -> String {
    WeatherVariable::all()
        .iter()
        .map(WeatherVariable::api_name)
        .collect::<Vec<_>>()
        .join(",")
}

/// One hour of observed, forecast or projected weather
///
/// Every variable is optional: `None` means upstream did not report a value
/// for that hour, and it must never be treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDataPoint {
    /// Local wall-clock hour this point describes
    #[serde(with = "iso_minutes")]
    pub time: NaiveDateTime,
    /// Temperature in Celsius
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<f64>,
    /// Relative humidity percentage (0-100)
    #[serde(rename = "relative_humidity_2m")]
    pub relative_humidity: Option<f64>,
    /// Precipitation in millimeters
    pub precipitation: Option<f64>,
    /// Wind speed in km/h
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<f64>,
}

impl WeatherDataPoint {
    /// Creates a point for `time` with no reported values
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time,
            temperature: None,
            relative_humidity: None,
            precipitation: None,
            wind_speed: None,
        }
    }

    pub fn value(&self, variable: WeatherVariable) -> Option<f64> {
        match variable {
            WeatherVariable::Temperature => self.temperature,
            WeatherVariable::RelativeHumidity => self.relative_humidity,
            WeatherVariable::Precipitation => self.precipitation,
            WeatherVariable::WindSpeed => self.wind_speed,
        }
    }

    pub fn set_value(&mut self, variable: WeatherVariable, value: Option<f64>) {
        let slot = match variable {
            WeatherVariable::Temperature => &mut self.temperature,
            WeatherVariable::RelativeHumidity => &mut self.relative_humidity,
            WeatherVariable::Precipitation => &mut self.precipitation,
            WeatherVariable::WindSpeed => &mut self.wind_speed,
        };
        *slot = value;
    }

    /// Builder-style setter, mostly useful when assembling fixtures
    pub fn with_value(mut self, variable: WeatherVariable, value: f64) -> Self {
        self.set_value(variable, Some(value));
        self
    }

    /// Copy of this point's values re-dated to `time`
    pub fn at(&self, time: NaiveDateTime) -> Self {
        Self {
            time,
            ..self.clone()
        }
    }

    /// Hour of day (0-23) of this point
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }
}

/// Geographic position of the location being queried
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds coordinates from optional parts, failing when either is absent
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Self, PipelineError> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => {
                let coords = Self::new(latitude, longitude);
                coords.validate()?;
                Ok(coords)
            }
            _ => Err(PipelineError::MissingCoordinates),
        }
    }

    /// Checks that both parts are finite and within geographic range
    pub fn validate(&self) -> Result<(), PipelineError> {
        let valid = self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);

        if valid {
            Ok(())
        } else {
            Err(PipelineError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Hourly archive values for one past year on the target month/day
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalYearSample {
    /// Calendar date that was requested from the archive
    pub date: NaiveDate,
    /// Hourly points in upstream order
    pub points: Vec<WeatherDataPoint>,
}

/// Serde adapter for the `YYYY-MM-DDTHH:MM` timestamps Open-Meteo uses
mod iso_minutes {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn test_hourly_query_lists_all_variables() {
        assert_eq!(
            hourly_query(),
            "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m"
        );
    }

    #[test]
    fn test_variable_from_str_aliases() {
        assert_eq!(WeatherVariable::from_str("temp"), Some(WeatherVariable::Temperature));
        assert_eq!(WeatherVariable::from_str("Temperature"), Some(WeatherVariable::Temperature));
        assert_eq!(
            WeatherVariable::from_str("relative_humidity_2m"),
            Some(WeatherVariable::RelativeHumidity)
        );
        assert_eq!(WeatherVariable::from_str("rain"), Some(WeatherVariable::Precipitation));
        assert_eq!(WeatherVariable::from_str(" wind "), Some(WeatherVariable::WindSpeed));
        assert_eq!(WeatherVariable::from_str("pressure"), None);
    }

    #[test]
    fn test_data_point_value_accessors() {
        let mut point = WeatherDataPoint::new(at("2024-07-15T14:00"));
        for variable in WeatherVariable::all() {
            assert_eq!(point.value(*variable), None);
        }

        point.set_value(WeatherVariable::Precipitation, Some(1.5));
        assert_eq!(point.value(WeatherVariable::Precipitation), Some(1.5));
        assert_eq!(point.precipitation, Some(1.5));

        let point = point.with_value(WeatherVariable::Temperature, 22.5);
        assert_eq!(point.temperature, Some(22.5));
        assert_eq!(point.hour(), 14);
    }

    #[test]
    fn test_data_point_at_keeps_values() {
        let point = WeatherDataPoint::new(at("2023-07-15T14:00"))
            .with_value(WeatherVariable::WindSpeed, 12.0);
        let moved = point.at(at("2026-07-15T14:00"));

        assert_eq!(moved.time, at("2026-07-15T14:00"));
        assert_eq!(moved.wind_speed, Some(12.0));
    }

    #[test]
    fn test_data_point_serializes_with_upstream_names() {
        let point = WeatherDataPoint::new(at("2024-07-15T14:00"))
            .with_value(WeatherVariable::Temperature, 22.5);
        let json = serde_json::to_value(&point).expect("Failed to serialize WeatherDataPoint");

        assert_eq!(json["time"], "2024-07-15T14:00");
        assert_eq!(json["temperature_2m"], 22.5);
        assert!(json["precipitation"].is_null());

        let back: WeatherDataPoint =
            serde_json::from_value(json).expect("Failed to deserialize WeatherDataPoint");
        assert_eq!(back, point);
    }

    #[test]
    fn test_coordinates_from_parts_requires_both() {
        assert!(matches!(
            Coordinates::from_parts(Some(-34.6), None),
            Err(PipelineError::MissingCoordinates)
        ));
        assert!(matches!(
            Coordinates::from_parts(None, Some(-58.4)),
            Err(PipelineError::MissingCoordinates)
        ));

        let coords = Coordinates::from_parts(Some(-34.6), Some(-58.4)).unwrap();
        assert!((coords.latitude + 34.6).abs() < 0.0001);
        assert!((coords.longitude + 58.4).abs() < 0.0001);
    }

    #[test]
    fn test_coordinates_zero_is_valid() {
        assert!(Coordinates::new(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_coordinates_validate_rejects_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -180.5).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).validate().is_err());
    }
}
