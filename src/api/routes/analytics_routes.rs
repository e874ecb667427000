//! Analytics routes (/api/v1/analytics/*)

use axum::{routing::get, Router};

use crate::api::controller::analytics_controller::AnalyticsController;
use crate::app_state::AppState;

/// Build the router for analytics endpoints under /api/v1/analytics
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(AnalyticsController::get_analytics))
        .route(
            "/daily-active-users",
            get(AnalyticsController::get_daily_active_users),
        )
        .route("/health", get(AnalyticsController::get_health))
}
