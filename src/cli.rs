//! Command-line interface parsing for quemepongo
//!
//! This module handles parsing of CLI arguments using clap and turning them
//! into a validated [`Config`] plus the location to look up.

use clap::Parser;
use thiserror::Error;

use crate::clock::SystemClock;
use crate::config::{Config, DEFAULT_HOURS_AHEAD};
use crate::data::weather::DEFAULT_TIMEZONE;
use crate::data::{Coordinates, WeatherVariable};
use crate::error::PipelineError;
use crate::pipeline::{FetchMode, MAX_HISTORY_YEARS, MAX_HOURS_AHEAD};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified variable name is not recognized
    #[error("Invalid variable: '{0}'. Valid variables: temperature, humidity, precipitation, wind")]
    InvalidVariable(String),

    /// Not an IANA timezone name
    #[error("Invalid timezone: '{0}'")]
    InvalidTimezone(String),

    #[error("Invalid hours ahead: {0} (expected 1..={})", MAX_HOURS_AHEAD)]
    InvalidHours(u32),

    #[error("Invalid number of years: {0} (expected 1..={})", MAX_HISTORY_YEARS)]
    InvalidYears(u8),

    /// Neither a place name nor coordinates were given
    #[error("Missing location: pass a place name or both --lat and --lon")]
    MissingLocation,

    #[error(transparent)]
    Coordinates(#[from] PipelineError),
}

/// ¿Qué me pongo? Compare the forecast with what the last years looked like
#[derive(Parser, Debug)]
#[command(name = "quemepongo")]
#[command(about = "Hourly forecast vs. multi-year historical projection, with clothing advice")]
#[command(version)]
pub struct Cli {
    /// Place to look up, e.g. "Buenos Aires"
    #[arg(value_name = "LOCATION", conflicts_with_all = ["lat", "lon"])]
    pub location: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Hours to project past the current hour
    #[arg(long, default_value_t = DEFAULT_HOURS_AHEAD)]
    pub hours: u32,

    /// Number of previous years to average
    #[arg(long, default_value_t = MAX_HISTORY_YEARS)]
    pub years: u8,

    /// Variable to compare: temperature, humidity, precipitation, wind
    #[arg(long, default_value = "temperature")]
    pub variable: String,

    /// IANA timezone for timestamps and the current hour
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Fetch archive years one at a time instead of concurrently
    #[arg(long)]
    pub sequential: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, env = "QUEMEPONGO_FORECAST_URL", hide = true)]
    pub forecast_url: Option<String>,

    #[arg(long, env = "QUEMEPONGO_ARCHIVE_URL", hide = true)]
    pub archive_url: Option<String>,

    #[arg(long, env = "QUEMEPONGO_GEOCODING_URL", hide = true)]
    pub geocoding_url: Option<String>,
}

/// What to load the dashboard for
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Free text, geocoded before loading
    Place(String),
    Coordinates(Coordinates),
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub target: Target,
    pub config: Config,
    pub json: bool,
    pub verbosity: u8,
}

/// Parses a variable string argument into a WeatherVariable.
///
/// # Returns
/// * `Ok(WeatherVariable)` if the string matches a known variable
/// * `Err(CliError::InvalidVariable)` if the string doesn't match
pub fn parse_variable_arg(s: &str) -> Result<WeatherVariable, CliError> {
    WeatherVariable::from_str(s).ok_or_else(|| CliError::InvalidVariable(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if a value is out of range or unknown
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let variable = parse_variable_arg(&cli.variable)?;

        if SystemClock::from_name(&cli.timezone).is_none() {
            return Err(CliError::InvalidTimezone(cli.timezone.clone()));
        }
        if !(1..=MAX_HOURS_AHEAD).contains(&cli.hours) {
            return Err(CliError::InvalidHours(cli.hours));
        }
        if !(1..=MAX_HISTORY_YEARS).contains(&cli.years) {
            return Err(CliError::InvalidYears(cli.years));
        }

        let target = match (&cli.location, cli.lat, cli.lon) {
            (Some(place), _, _) if !place.trim().is_empty() => Target::Place(place.trim().to_string()),
            (_, None, None) => return Err(CliError::MissingLocation),
            (_, lat, lon) => Target::Coordinates(Coordinates::from_parts(lat, lon)?),
        };

        let mut config = Config {
            timezone: cli.timezone.clone(),
            hours_ahead: cli.hours,
            variable,
            ..Config::default()
        };
        config.projection.history_years = cli.years;
        if cli.sequential {
            config.projection.fetch_mode = FetchMode::Sequential;
        }
        if let Some(url) = &cli.forecast_url {
            config.endpoints.forecast_url = url.clone();
        }
        if let Some(url) = &cli.archive_url {
            config.endpoints.archive_url = url.clone();
        }
        if let Some(url) = &cli.geocoding_url {
            config.endpoints.geocoding_url = url.clone();
        }

        Ok(StartupConfig {
            target,
            config,
            json: cli.json,
            verbosity: cli.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn startup(args: &[&str]) -> Result<StartupConfig, CliError> {
        let cli = Cli::parse_from(std::iter::once("quemepongo").chain(args.iter().copied()));
        StartupConfig::from_cli(&cli)
    }

    #[test]
    fn test_parse_variable_arg_aliases() {
        assert_eq!(parse_variable_arg("temp").unwrap(), WeatherVariable::Temperature);
        assert_eq!(parse_variable_arg("humidity").unwrap(), WeatherVariable::RelativeHumidity);
        assert_eq!(parse_variable_arg("rain").unwrap(), WeatherVariable::Precipitation);
        assert_eq!(parse_variable_arg("wind").unwrap(), WeatherVariable::WindSpeed);
    }

    #[test]
    fn test_parse_variable_arg_invalid() {
        let err = parse_variable_arg("pressure").unwrap_err();
        assert!(err.to_string().contains("Invalid variable"));
        assert!(err.to_string().contains("pressure"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["quemepongo", "Buenos Aires"]);
        assert_eq!(cli.location.as_deref(), Some("Buenos Aires"));
        assert_eq!(cli.hours, 6);
        assert_eq!(cli.years, 10);
        assert_eq!(cli.variable, "temperature");
        assert_eq!(cli.timezone, "America/Argentina/Buenos_Aires");
        assert!(!cli.sequential);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_startup_config_place() {
        let config = startup(&["  Mar del Plata "]).unwrap();
        assert_eq!(config.target, Target::Place("Mar del Plata".to_string()));
        assert_eq!(config.config.hours_ahead, 6);
        assert_eq!(config.config.projection.fetch_mode, FetchMode::Concurrent);
    }

    #[test]
    fn test_startup_config_coordinates_allow_negatives() {
        let config = startup(&["--lat", "-34.6", "--lon", "-58.4", "--hours", "12"]).unwrap();
        assert_eq!(
            config.target,
            Target::Coordinates(Coordinates::new(-34.6, -58.4))
        );
        assert_eq!(config.config.hours_ahead, 12);
    }

    #[test]
    fn test_startup_config_options() {
        let config = startup(&[
            "Madrid",
            "--years",
            "3",
            "--sequential",
            "--variable",
            "wind",
            "--timezone",
            "Europe/Madrid",
            "--json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(config.config.projection.history_years, 3);
        assert_eq!(config.config.projection.fetch_mode, FetchMode::Sequential);
        assert_eq!(config.config.variable, WeatherVariable::WindSpeed);
        assert_eq!(config.config.timezone, "Europe/Madrid");
        assert!(config.json);
        assert_eq!(config.verbosity, 2);
    }

    #[test]
    fn test_startup_config_rejects_out_of_range() {
        assert!(matches!(startup(&["X", "--hours", "0"]), Err(CliError::InvalidHours(0))));
        assert!(matches!(startup(&["X", "--hours", "49"]), Err(CliError::InvalidHours(49))));
        assert!(matches!(startup(&["X", "--years", "11"]), Err(CliError::InvalidYears(11))));
        assert!(matches!(
            startup(&["X", "--timezone", "Nowhere/Land"]),
            Err(CliError::InvalidTimezone(_))
        ));
        assert!(matches!(
            startup(&["X", "--variable", "snow"]),
            Err(CliError::InvalidVariable(_))
        ));
    }

    #[test]
    fn test_startup_config_requires_location() {
        assert!(matches!(startup(&[]), Err(CliError::MissingLocation)));
        assert!(matches!(startup(&["   "]), Err(CliError::MissingLocation)));
    }

    #[test]
    fn test_startup_config_invalid_coordinates() {
        let result = startup(&["--lat", "95", "--lon", "0"]);
        assert!(matches!(
            result,
            Err(CliError::Coordinates(PipelineError::InvalidCoordinates { .. }))
        ));
    }

    #[test]
    fn test_lat_requires_lon() {
        let result = Cli::try_parse_from(["quemepongo", "--lat", "-34.6"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_location_conflicts_with_coordinates() {
        let result = Cli::try_parse_from(["quemepongo", "Madrid", "--lat", "1", "--lon", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_overrides() {
        let config = startup(&[
            "Madrid",
            "--forecast-url",
            "http://localhost:1/f",
            "--archive-url",
            "http://localhost:1/a",
            "--geocoding-url",
            "http://localhost:1/g",
        ])
        .unwrap();

        assert_eq!(config.config.endpoints.forecast_url, "http://localhost:1/f");
        assert_eq!(config.config.endpoints.archive_url, "http://localhost:1/a");
        assert_eq!(config.config.endpoints.geocoding_url, "http://localhost:1/g");
    }
}
