//! Merging the forecast and projection onto one hourly axis

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use super::calendar::window_hours;
use crate::data::{WeatherDataPoint, WeatherVariable};

/// Which fallbacks the aligner may use after an exact timestamp miss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignOptions {
    /// Nearest point with the same hour of day
    pub nearest_hour: bool,
    /// Pair by index when a series shares no hour of day with the labels
    pub positional: bool,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            nearest_hour: true,
            positional: true,
        }
    }
}

/// Two value series sharing one label axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub variable: WeatherVariable,
    #[serde(serialize_with = "serialize_labels")]
    pub labels: Vec<NaiveDateTime>,
    pub forecast: Vec<Option<f64>>,
    pub projection: Vec<Option<f64>>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Aligns both series onto the window from one hour before `now` to
/// `hours_ahead` hours after it.
///
/// Each series is resolved independently: exact timestamp, then (optionally)
/// the nearest same-hour point, and when nothing in the series shares an hour
/// of day with the labels, (optionally) by position. Unresolved slots are
/// `None`.
pub fn align_series(
    forecast: &[WeatherDataPoint],
    projection: &[WeatherDataPoint],
    now: NaiveDateTime,
    hours_ahead: u32,
    variable: WeatherVariable,
    options: AlignOptions,
) -> AlignedSeries {
    let labels = window_hours(now, hours_ahead);

    AlignedSeries {
        variable,
        forecast: resolve(forecast, &labels, variable, options),
        projection: resolve(projection, &labels, variable, options),
        labels,
    }
}

fn resolve(
    series: &[WeatherDataPoint],
    labels: &[NaiveDateTime],
    variable: WeatherVariable,
    options: AlignOptions,
) -> Vec<Option<f64>> {
    let shares_an_hour = labels
        .iter()
        .any(|label| series.iter().any(|p| p.hour() == label.hour()));

    if !shares_an_hour && options.positional && !series.is_empty() {
        tracing::debug!(
            variable = variable.api_name(),
            "no shared hours of day; aligning by position"
        );
        return (0..labels.len())
            .map(|i| series.get(i).and_then(|p| p.value(variable)))
            .collect();
    }

    labels
        .iter()
        .map(|label| find_point(series, *label, options.nearest_hour).and_then(|p| p.value(variable)))
        .collect()
}

/// Point stamped exactly `label`, or with `nearest_hour` the closest point
/// sharing its hour of day. Ties go to the earlier point in the series.
pub fn find_point(
    series: &[WeatherDataPoint],
    label: NaiveDateTime,
    nearest_hour: bool,
) -> Option<&WeatherDataPoint> {
    if let Some(exact) = series.iter().find(|p| p.time == label) {
        return Some(exact);
    }
    if !nearest_hour {
        return None;
    }

    series
        .iter()
        .filter(|p| p.hour() == label.hour())
        .min_by_key(|p| (p.time - label).num_seconds().abs())
}

fn serialize_labels<S: serde::Serializer>(
    labels: &[NaiveDateTime],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(labels.iter().map(|t| t.format("%Y-%m-%dT%H:%M").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    fn series(start: &str, values: &[f64]) -> Vec<WeatherDataPoint> {
        let start = at(start);
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                WeatherDataPoint::new(start + Duration::hours(i as i64))
                    .with_value(WeatherVariable::Temperature, *v)
            })
            .collect()
    }

    #[test]
    fn test_exact_matches_line_up() {
        let now = at("2026-03-10T15:30");
        let forecast = series("2026-03-10T14:00", &[20.0, 21.0, 22.0, 23.0]);
        let projection = series("2026-03-10T14:00", &[18.0, 19.0, 20.0, 21.0]);

        let aligned = align_series(
            &forecast,
            &projection,
            now,
            2,
            WeatherVariable::Temperature,
            AlignOptions::default(),
        );

        assert_eq!(aligned.len(), 4);
        assert_eq!(aligned.labels[0], at("2026-03-10T14:00"));
        assert_eq!(aligned.forecast, vec![Some(20.0), Some(21.0), Some(22.0), Some(23.0)]);
        assert_eq!(aligned.projection, vec![Some(18.0), Some(19.0), Some(20.0), Some(21.0)]);
    }

    #[test]
    fn test_offset_hour_sets_leave_gaps() {
        // Projection covers 14..16, forecast covers 15..17
        let now = at("2026-03-10T15:10");
        let projection = series("2026-03-10T14:00", &[14.0, 15.0, 16.0]);
        let forecast = series("2026-03-10T15:00", &[15.5, 16.5, 17.5]);

        let aligned = align_series(
            &forecast,
            &projection,
            now,
            2,
            WeatherVariable::Temperature,
            AlignOptions::default(),
        );

        assert_eq!(
            aligned.labels,
            vec![
                at("2026-03-10T14:00"),
                at("2026-03-10T15:00"),
                at("2026-03-10T16:00"),
                at("2026-03-10T17:00"),
            ]
        );
        assert_eq!(aligned.forecast, vec![None, Some(15.5), Some(16.5), Some(17.5)]);
        assert_eq!(aligned.projection, vec![Some(14.0), Some(15.0), Some(16.0), None]);
    }

    #[test]
    fn test_nearest_same_hour_used_when_dates_differ() {
        let now = at("2026-03-10T15:00");
        // Raw fallback series still dated in the reference year
        let projection = series("2023-03-10T14:00", &[1.0, 2.0, 3.0]);
        let forecast = series("2026-03-10T14:00", &[10.0, 11.0, 12.0]);

        let aligned = align_series(
            &forecast,
            &projection,
            now,
            1,
            WeatherVariable::Temperature,
            AlignOptions::default(),
        );

        assert_eq!(aligned.projection, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_nearest_hour_disabled_leaves_gaps() {
        let now = at("2026-03-10T15:00");
        let projection = series("2023-03-10T14:00", &[1.0, 2.0, 3.0]);

        let options = AlignOptions {
            nearest_hour: false,
            positional: true,
        };
        let aligned =
            align_series(&[], &projection, now, 1, WeatherVariable::Temperature, options);

        assert_eq!(aligned.projection, vec![None, None, None]);
        assert_eq!(aligned.forecast, vec![None, None, None]);
    }

    #[test]
    fn test_find_point_picks_closest_same_hour() {
        let points = series("2026-03-08T15:00", &[0.0; 72]);
        let found = find_point(&points, at("2026-03-10T15:00"), true).unwrap();
        assert_eq!(found.time, at("2026-03-10T15:00"));

        let found = find_point(&points[..30], at("2026-03-10T15:00"), true).unwrap();
        // Only 2026-03-08T15 and 2026-03-09T15 remain; the later one is closer
        assert_eq!(found.time, at("2026-03-09T15:00"));
    }

    #[test]
    fn test_positional_fallback_when_no_hours_shared() {
        let now = at("2026-03-10T15:00");
        let projection = series("2023-03-10T02:00", &[2.0, 3.0, 4.0, 5.0]);

        let aligned = align_series(
            &[],
            &projection,
            now,
            1,
            WeatherVariable::Temperature,
            AlignOptions::default(),
        );
        assert_eq!(aligned.projection, vec![Some(2.0), Some(3.0), Some(4.0)]);

        let strict = AlignOptions {
            nearest_hour: true,
            positional: false,
        };
        let aligned =
            align_series(&[], &projection, now, 1, WeatherVariable::Temperature, strict);
        assert_eq!(aligned.projection, vec![None, None, None]);
    }

    #[test]
    fn test_missing_values_stay_none() {
        let now = at("2026-03-10T15:00");
        let mut forecast = series("2026-03-10T14:00", &[1.0, 2.0, 3.0]);
        forecast[1].temperature = None;

        let aligned = align_series(
            &forecast,
            &[],
            now,
            1,
            WeatherVariable::Temperature,
            AlignOptions::default(),
        );
        assert_eq!(aligned.forecast, vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(aligned.projection, vec![None, None, None]);
    }

    #[test]
    fn test_serializes_labels_as_iso_minutes() {
        let now = at("2026-03-10T00:20");
        let aligned = align_series(
            &[],
            &[],
            now,
            1,
            WeatherVariable::WindSpeed,
            AlignOptions::default(),
        );
        let json = serde_json::to_value(&aligned).unwrap();

        assert_eq!(json["variable"], "wind_speed");
        assert_eq!(json["labels"][0], "2026-03-09T23:00");
        assert!(json["forecast"][0].is_null());
    }
}
