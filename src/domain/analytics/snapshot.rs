//! Aggregation output types. The serialized shape is the contract of
//! record consumed by the dashboard; field names are load-bearing.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCharts {
    pub daily_active_users: Vec<ChartPoint>,
    pub posts_created: Vec<ChartPoint>,
    pub daily_comments: Vec<ChartPoint>,
    pub daily_rewards: Vec<ChartPoint>,
}

/// Complete, immutable aggregation result for one request. Constructed
/// fresh per call, never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub daily_active_users_24h: i64,
    pub previous_day_users_24h: i64,
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_rewards: f64,
    pub charts: SnapshotCharts,
}
