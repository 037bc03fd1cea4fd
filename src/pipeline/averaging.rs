//! Same-hour averaging across archive years

use crate::data::{HistoricalYearSample, WeatherDataPoint, WeatherVariable};

/// Averages every variable per hour index across the retrieved years.
///
/// The first sample is the reference: the output has one point per reference
/// point and copies its `time` verbatim. Samples shorter than the reference
/// simply contribute nothing at the missing indices. A variable with no
/// reported value in any year stays `None`.
pub fn average_samples(samples: &[HistoricalYearSample]) -> Vec<WeatherDataPoint> {
    let Some(reference) = samples.first() else {
        return Vec::new();
    };

    reference
        .points
        .iter()
        .enumerate()
        .map(|(i, template)| {
            let mut point = WeatherDataPoint::new(template.time);
            for variable in WeatherVariable::all() {
                let values = samples
                    .iter()
                    .filter_map(|sample| sample.points.get(i))
                    .filter_map(|p| p.value(*variable));
                point.set_value(*variable, mean(values).map(round2));
            }
            point
        })
        .collect()
}

/// Arithmetic mean of the finite values, `None` when there are none
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
