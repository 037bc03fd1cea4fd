//! Forecast and projection pipelines
//!
//! Upstream fetch, historical averaging, calendar reconstruction and the
//! final alignment of both series onto one hourly axis.

pub mod align;
pub mod averaging;
pub mod calendar;
pub mod forecast;
pub mod projection;

pub use align::{align_series, AlignOptions, AlignedSeries};
pub use forecast::get_forecast_data;
pub use projection::{
    get_projection_data, FetchMode, ProjectionConfig, MAX_HISTORY_YEARS, MAX_HOURS_AHEAD,
};
