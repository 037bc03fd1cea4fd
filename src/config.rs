//! Application configuration
//!
//! Plain structs with sensible defaults. The CLI builds a [`Config`] in
//! `StartupConfig::from_cli`; library users can construct one directly.

use std::time::Duration;

use crate::data::geocoding::NOMINATIM_SEARCH_URL;
use crate::data::weather::{DEFAULT_TIMEZONE, OPEN_METEO_ARCHIVE_URL, OPEN_METEO_FORECAST_URL};
use crate::data::WeatherVariable;
use crate::pipeline::{AlignOptions, ProjectionConfig};

/// Default number of hours projected past the current hour
pub const DEFAULT_HOURS_AHEAD: u32 = 6;

/// Upstream base URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub forecast_url: String,
    pub archive_url: String,
    pub geocoding_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            forecast_url: OPEN_METEO_FORECAST_URL.to_string(),
            archive_url: OPEN_METEO_ARCHIVE_URL.to_string(),
            geocoding_url: NOMINATIM_SEARCH_URL.to_string(),
        }
    }
}

/// Per-request timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub forecast: Duration,
    pub archive: Duration,
    pub geocoding: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            forecast: Duration::from_secs(10),
            archive: Duration::from_secs(20),
            geocoding: Duration::from_secs(10),
        }
    }
}

/// Everything needed to run one dashboard request
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// IANA timezone for upstream timestamps and the wall clock
    pub timezone: String,
    pub endpoints: Endpoints,
    pub timeouts: Timeouts,
    /// Days of forecast requested in addition to the previous day
    pub forecast_days: u8,
    pub hours_ahead: u32,
    /// Variable compared in the table and sparklines
    pub variable: WeatherVariable,
    pub projection: ProjectionConfig,
    pub align: AlignOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            endpoints: Endpoints::default(),
            timeouts: Timeouts::default(),
            forecast_days: 2,
            hours_ahead: DEFAULT_HOURS_AHEAD,
            variable: WeatherVariable::Temperature,
            projection: ProjectionConfig::default(),
            align: AlignOptions::default(),
        }
    }
}
