use std::sync::Arc;

use crate::core::client::executor::QueryExecutor;
use crate::domain::analytics::service::AnalyticsService;

#[derive(Clone)]
pub struct AppState {
    pub analytics_service: Arc<AnalyticsService>,
}

/// Wire the application state from an injected query executor. Tests
/// substitute a mock executor; production injects the HiveSQL client.
pub fn build_app_state(executor: Arc<dyn QueryExecutor>) -> AppState {
    AppState {
        analytics_service: Arc::new(AnalyticsService::new(executor)),
    }
}
