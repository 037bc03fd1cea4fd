//! Dashboard runner: one request, both pipelines
//!
//! Forecast and projection are loaded concurrently and each outcome is kept
//! on its own, so a failed projection still leaves the forecast on screen
//! and vice versa.

use chrono::NaiveDateTime;

use crate::clock::Clock;
use crate::config::Config;
use crate::data::{Coordinates, OpenMeteoClient, WeatherDataPoint, WeatherVariable};
use crate::error::PipelineError;
use crate::pipeline::{
    align_series, get_forecast_data, get_projection_data, AlignOptions, AlignedSeries,
    ProjectionConfig,
};
use crate::recommendations::{recommend, Condition};
use crate::summary::{summarize, SummaryRow};

/// Everything needed to serve dashboard requests
pub struct Dashboard {
    weather: OpenMeteoClient,
    clock: Box<dyn Clock>,
    projection: ProjectionConfig,
    align: AlignOptions,
}

impl Dashboard {
    pub fn new(weather: OpenMeteoClient, clock: Box<dyn Clock>) -> Self {
        Self {
            weather,
            clock,
            projection: ProjectionConfig::default(),
            align: AlignOptions::default(),
        }
    }

    /// Dashboard wired from the application configuration
    pub fn from_config(config: &Config, clock: Box<dyn Clock>) -> Self {
        Self::new(OpenMeteoClient::from_config(config), clock)
            .with_projection(config.projection.clone())
            .with_align(config.align)
    }

    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_align(mut self, align: AlignOptions) -> Self {
        self.align = align;
        self
    }

    /// Loads forecast and projection concurrently
    ///
    /// "Now" is read once so both pipelines and the aligner share it.
    pub async fn load(&self, coords: Coordinates, hours_ahead: u32) -> DashboardReport {
        let now = self.clock.now();
        tracing::info!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            hours_ahead,
            %now,
            "loading dashboard"
        );

        let (forecast, projection) = tokio::join!(
            get_forecast_data(&self.weather, &coords, now),
            get_projection_data(&self.weather, &coords, hours_ahead, now, &self.projection),
        );

        if let Err(err) = &forecast {
            tracing::error!(error = %err, "forecast pipeline failed");
        }
        if let Err(err) = &projection {
            tracing::error!(error = %err, "projection pipeline failed");
        }

        DashboardReport {
            generated_at: now,
            coordinates: coords,
            hours_ahead,
            align: self.align,
            forecast,
            projection,
        }
    }
}

/// Outcome of one dashboard request
#[derive(Debug)]
pub struct DashboardReport {
    /// The instant both pipelines were computed for
    pub generated_at: NaiveDateTime,
    pub coordinates: Coordinates,
    pub hours_ahead: u32,
    /// Fallbacks used when aligning the two series
    pub align: AlignOptions,
    pub forecast: Result<Vec<WeatherDataPoint>, PipelineError>,
    pub projection: Result<Vec<WeatherDataPoint>, PipelineError>,
}

impl DashboardReport {
    pub fn forecast_points(&self) -> &[WeatherDataPoint] {
        self.forecast.as_deref().unwrap_or(&[])
    }

    pub fn projection_points(&self) -> &[WeatherDataPoint] {
        self.projection.as_deref().unwrap_or(&[])
    }

    /// Both series on the shared hourly axis; a failed side is all gaps
    pub fn aligned(&self, variable: WeatherVariable) -> AlignedSeries {
        align_series(
            self.forecast_points(),
            self.projection_points(),
            self.generated_at,
            self.hours_ahead,
            variable,
            self.align,
        )
    }

    pub fn summary(&self, variable: WeatherVariable) -> Vec<SummaryRow> {
        summarize(self.forecast_points(), self.projection_points(), variable)
    }

    /// Clothing advice from the projection; none when it failed
    pub fn recommendations(&self) -> Vec<Condition> {
        match &self.projection {
            Ok(points) => recommend(points),
            Err(_) => Vec::new(),
        }
    }

    /// Banner lines for the pipelines that failed
    pub fn errors(&self) -> Vec<String> {
        [&self.forecast, &self.projection]
            .into_iter()
            .filter_map(|result| result.as_ref().err())
            .map(PipelineError::user_message)
            .collect()
    }
}
