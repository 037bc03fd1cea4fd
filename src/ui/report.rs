//! Text and JSON views of a dashboard report

use std::fmt::Write;

use serde::Serialize;

use super::widgets::sparkline::{value_range, Sparkline};
use crate::dashboard::DashboardReport;
use crate::data::{Coordinates, WeatherVariable};
use crate::pipeline::AlignedSeries;
use crate::recommendations::Condition;
use crate::summary::{format_difference, format_value, SummaryRow};

/// Decimal places shown per variable
fn precision(variable: WeatherVariable) -> usize {
    match variable {
        WeatherVariable::RelativeHumidity => 0,
        _ => 1,
    }
}

/// Renders the report as the terminal dashboard.
///
/// Sections: header, error banners, comparison table, sparklines,
/// recommendations. Sections with nothing to show are left out.
pub fn render_text(report: &DashboardReport, place: &str, variable: WeatherVariable) -> String {
    let mut out = String::new();
    let aligned = report.aligned(variable);
    let unit = variable.unit();
    let digits = precision(variable);

    let _ = writeln!(out, "¿Qué me pongo? {}", place);
    let _ = writeln!(
        out,
        "{} | next {} hours | {}",
        report.generated_at.format("%Y-%m-%d %H:%M"),
        report.hours_ahead,
        variable.label()
    );

    for message in report.errors() {
        let _ = writeln!(out, "! {}", message);
    }
    out.push('\n');

    let _ = writeln!(out, "{:<6} {:>10} {:>11} {:>9}", "Hour", "Forecast", "Projection", "Diff");
    for i in 0..aligned.len() {
        let row = SummaryRow {
            time: aligned.labels[i],
            forecast: aligned.forecast[i],
            projection: aligned.projection[i],
        };
        let _ = writeln!(
            out,
            "{:<6} {:>10} {:>11} {:>9}",
            row.time.format("%H:%M"),
            format_value(row.forecast, unit, digits),
            format_value(row.projection, unit, digits),
            format_difference(row.difference(), unit),
        );
    }

    if let Some((min, max)) = shared_range(&aligned) {
        out.push('\n');
        let _ = writeln!(
            out,
            "Forecast   {}",
            Sparkline::new(&aligned.forecast).with_range(min, max).render()
        );
        let _ = writeln!(
            out,
            "Projection {}",
            Sparkline::new(&aligned.projection).with_range(min, max).render()
        );
    }

    let conditions = report.recommendations();
    if !conditions.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "What to wear:");
        for condition in conditions {
            let _ = writeln!(out, "  * {}: {}", condition.label(), condition.clothing());
            let _ = writeln!(out, "    {}", condition.advice());
        }
    }

    out
}

fn shared_range(aligned: &AlignedSeries) -> Option<(f64, f64)> {
    value_range(
        aligned
            .forecast
            .iter()
            .chain(aligned.projection.iter())
            .flatten()
            .copied(),
    )
}

/// Serializable view of a report
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub place: String,
    pub coordinates: Coordinates,
    pub generated_at: String,
    pub hours_ahead: u32,
    pub aligned: AlignedSeries,
    pub summary: Vec<SummaryRow>,
    pub recommendations: Vec<JsonCondition>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonCondition {
    pub condition: Condition,
    pub label: &'static str,
    pub clothing: &'static str,
    pub advice: &'static str,
}

pub fn json_report(report: &DashboardReport, place: &str, variable: WeatherVariable) -> JsonReport {
    JsonReport {
        place: place.to_string(),
        coordinates: report.coordinates,
        generated_at: report.generated_at.format("%Y-%m-%dT%H:%M").to_string(),
        hours_ahead: report.hours_ahead,
        aligned: report.aligned(variable),
        summary: report.summary(variable),
        recommendations: report
            .recommendations()
            .into_iter()
            .map(|condition| JsonCondition {
                condition,
                label: condition.label(),
                clothing: condition.clothing(),
                advice: condition.advice(),
            })
            .collect(),
        errors: report.errors(),
    }
}
