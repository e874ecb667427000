//! Payout string parsing and reward reduction.
//!
//! HiveSQL stores payouts as currency-suffixed strings (`"1.523 HBD"`).
//! An unparsable value contributes zero so dashboards keep rendering
//! under dirty data; nothing in this module can fail.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::core::client::executor::SqlRow;

/// Parse the numeric amount out of a currency-suffixed string.
/// `"1.5 HBD"` -> 1.5, `"abc HBD"` -> 0.0.
pub fn parse_amount(raw: &str) -> f64 {
    raw.split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Author payout plus curator payout for one content row.
pub fn row_payout(row: &SqlRow) -> f64 {
    field_amount(row, "total_payout_value") + field_amount(row, "curator_payout_value")
}

fn field_amount(row: &SqlRow, field: &str) -> f64 {
    match row.get(field) {
        Some(Value::String(s)) => parse_amount(s),
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Sum payouts over a full row set.
pub fn total_rewards(rows: &[SqlRow]) -> f64 {
    rows.iter().map(row_payout).sum()
}

/// Fold per-post payout rows into one row per calendar day, newest-first,
/// matching the shape of the SQL-grouped series so the result flows
/// through the same chart normalizer.
pub fn daily_rewards(rows: &[SqlRow]) -> Vec<SqlRow> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for row in rows {
        let Some(date) = row
            .get("date")
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        else {
            continue;
        };
        *by_day.entry(date).or_default() += row_payout(row);
    }

    by_day
        .into_iter()
        .rev()
        .map(|(date, sum)| {
            let mut row = SqlRow::new();
            row.insert("date".into(), json!(date.format("%Y-%m-%d").to_string()));
            row.insert("daily_rewards".into(), json!(sum));
            row
        })
        .collect()
}
