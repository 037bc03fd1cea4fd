//! quemepongo - what should I wear?
//!
//! Looks up a place, loads the short-term forecast and the multi-year
//! historical projection for the same hours, and prints the comparison with
//! clothing advice.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quemepongo::cli::{Cli, StartupConfig, Target};
use quemepongo::clock::SystemClock;
use quemepongo::dashboard::Dashboard;
use quemepongo::data::GeocodingClient;
use quemepongo::ui;

/// Logs go to stderr so stdout stays clean for the report (and `--json`).
/// `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(2);
        }
    };
    init_tracing(startup.verbosity);

    let config = &startup.config;

    let (place, coords) = match &startup.target {
        Target::Coordinates(coords) => (
            format!("{:.4}, {:.4}", coords.latitude, coords.longitude),
            *coords,
        ),
        Target::Place(name) => {
            let geocoder = GeocodingClient::from_config(config);
            match geocoder.search(name).await {
                Ok(places) => match places.into_iter().next() {
                    Some(place) => {
                        let coords = place.coordinates();
                        (place.name, coords)
                    }
                    None => {
                        eprintln!("No places found for '{}'", name);
                        return ExitCode::FAILURE;
                    }
                },
                Err(err) => {
                    tracing::error!(error = %err, "geocoding failed");
                    eprintln!("Could not look up '{}': {}", name, err);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    // Validated in StartupConfig::from_cli
    let Some(clock) = SystemClock::from_name(&config.timezone) else {
        eprintln!("error: invalid timezone '{}'", config.timezone);
        return ExitCode::from(2);
    };

    let dashboard = Dashboard::from_config(config, Box::new(clock));
    let report = dashboard.load(coords, config.hours_ahead).await;

    if startup.json {
        match serde_json::to_string_pretty(&ui::json_report(&report, &place, config.variable)) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("error: failed to serialize report: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", ui::render_text(&report, &place, config.variable));
    }

    if report.forecast.is_err() && report.projection.is_err() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
