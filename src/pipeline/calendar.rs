//! Calendar-correct hour arithmetic and projection re-dating
//!
//! Averaged archive points only carry a useful hour of day; their dates are
//! the reference year's. This module assigns each hour of the projection
//! window its real date, including the hour before midnight and every
//! 23 -> 0 rollover.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::data::WeatherDataPoint;

/// Moves `offset` hours from `hour` on `date`, returning the new date and hour of day.
///
/// Works on a combined (day, hour) value with Euclidean division, so negative
/// offsets and multi-day windows need no special cases. Returns `None` only
/// when the date would leave chrono's supported range.
pub fn add_hours(date: NaiveDate, hour: u32, offset: i64) -> Option<(NaiveDate, u32)> {
    let total = i64::from(hour) + offset;
    let days = total.div_euclid(24);
    let hour = total.rem_euclid(24) as u32;
    let date = date.checked_add_signed(Duration::days(days))?;
    Some((date, hour))
}

/// Hour timestamps from one hour before `now` through `hours_ahead` hours after it
pub fn window_hours(now: NaiveDateTime, hours_ahead: u32) -> Vec<NaiveDateTime> {
    (-1..=i64::from(hours_ahead))
        .filter_map(|offset| {
            let (date, hour) = add_hours(now.date(), now.hour(), offset)?;
            date.and_hms_opt(hour, 0, 0)
        })
        .collect()
}

/// Index points by hour of day; the first point seen for an hour wins
pub fn index_by_hour(points: &[WeatherDataPoint]) -> BTreeMap<u32, &WeatherDataPoint> {
    let mut by_hour = BTreeMap::new();
    for point in points {
        by_hour.entry(point.hour()).or_insert(point);
    }
    by_hour
}

/// Re-dates averaged points onto the window around `now`.
///
/// Hours absent from `averaged` are skipped. If fewer than `hours_ahead + 1`
/// points survive and `fallback` is set, the first `hours_ahead + 2` raw
/// averaged points are returned instead, with their template dates.
pub fn reconstruct(
    averaged: &[WeatherDataPoint],
    now: NaiveDateTime,
    hours_ahead: u32,
    fallback: bool,
) -> Vec<WeatherDataPoint> {
    let by_hour = index_by_hour(averaged);

    let points: Vec<WeatherDataPoint> = window_hours(now, hours_ahead)
        .into_iter()
        .filter_map(|time| by_hour.get(&time.hour()).map(|source| source.at(time)))
        .collect();

    let minimum = hours_ahead as usize + 1;
    if fallback && points.len() < minimum {
        tracing::warn!(
            reconstructed = points.len(),
            minimum,
            "too few hours reconstructed; falling back to raw averaged series"
        );
        return averaged.iter().take(minimum + 1).cloned().collect();
    }

    points
}
