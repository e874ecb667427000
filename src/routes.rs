use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::api::controller::analytics_controller::AnalyticsController;
use crate::app_state::AppState;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    // Analytics subrouter lives under /api/v1
    let api_v1 = Router::new().nest(
        "/analytics",
        crate::api::routes::analytics_routes::analytics_routes(),
    );

    Router::new()
        // Root route
        .route("/", get(root))
        // Health check (probe-backed)
        .route("/health", get(AnalyticsController::get_health))
        // API v1
        .nest("/api/v1", api_v1)
        // Fallback handler for 404
        .fallback(handler_404)
        .layer(CorsLayer::very_permissive())
}

// Handler for root
async fn root() -> &'static str {
    "Server is running!"
}

// Handler for 404 Not Found
async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
