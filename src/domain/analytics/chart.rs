//! Chart normalization: grouped-by-day rows to display-ready points.

use chrono::NaiveDate;
use serde_json::Value;

use crate::core::client::executor::SqlRow;
use crate::domain::analytics::snapshot::ChartPoint;

/// Convert a newest-first grouped series into an oldest-first chart
/// series with short date labels. The reversal is part of the contract:
/// source queries order newest-first, charts render left-to-right.
pub fn normalize(rows: &[SqlRow], value_field: &str) -> Vec<ChartPoint> {
    rows.iter()
        .rev()
        .map(|row| ChartPoint {
            date: date_label(row.get("date")),
            value: coerce_value(row.get(value_field)),
        })
        .collect()
}

/// Short human label, e.g. `2024-03-09` -> `Mar 9`. A date that does not
/// parse is passed through verbatim rather than dropped.
fn date_label(value: Option<&Value>) -> String {
    let Some(raw) = value.and_then(Value::as_str) else {
        return String::new();
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format("%b %-d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn coerce_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => s.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}
