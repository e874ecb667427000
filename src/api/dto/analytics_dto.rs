//! Analytics API DTOs

use serde::Deserialize;

/// Period tokens accepted at the HTTP boundary. The resolver itself is
/// lenient; the API is not.
pub const VALID_PERIODS: [&str; 4] = ["7D", "30D", "90D", "All"];

#[derive(Deserialize, Debug)]
pub struct AnalyticsQuery {
    pub period: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct DailyUsersQuery {
    pub days: Option<i64>,
}
