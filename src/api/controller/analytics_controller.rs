//! Analytics endpoints. Request validation and JSON shaping only; all
//! aggregation logic lives in the domain service.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::api::dto::analytics_dto::{AnalyticsQuery, DailyUsersQuery, VALID_PERIODS};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::client::executor::SqlRow;
use crate::domain::analytics::snapshot::AnalyticsSnapshot;
use crate::errors::AppError;

pub struct AnalyticsController;

impl AnalyticsController {
    /// Full snapshot for one period token. The token is validated here
    /// against the closed set; the resolver's lenient default is not an
    /// HTTP validation boundary.
    pub async fn get_analytics(
        State(state): State<AppState>,
        Query(q): Query<AnalyticsQuery>,
    ) -> Result<Json<ApiResponse<AnalyticsSnapshot>>, AppError> {
        let period = q.period.unwrap_or_else(|| "90D".to_string());
        if !VALID_PERIODS.contains(&period.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Invalid period parameter. Must be one of: {}",
                VALID_PERIODS.join(", ")
            )));
        }

        to_json(state.analytics_service.build_snapshot(&period).await)
    }

    /// Raw newest-first daily active-user rows for an arbitrary window.
    pub async fn get_daily_active_users(
        State(state): State<AppState>,
        Query(q): Query<DailyUsersQuery>,
    ) -> Result<Json<ApiResponse<Vec<SqlRow>>>, AppError> {
        let days = q.days.unwrap_or(90).clamp(1, 365);
        to_json(state.analytics_service.daily_active_users(days).await)
    }

    /// Probe-backed health report: 200 when the data source answers the
    /// minimal query, 503 otherwise. Never propagates the failure.
    pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
        if state.analytics_service.probe().await {
            (
                StatusCode::OK,
                Json(json!({
                    "status": "healthy",
                    "hivesql": "connected",
                    "timestamp": Utc::now(),
                })),
            )
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "hivesql": "disconnected",
                    "timestamp": Utc::now(),
                })),
            )
        }
    }
}
