mod api;
mod app_state;
mod core;
mod domain;
mod errors;
mod routes;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::client::executor::QueryExecutor;
use crate::core::client::hivesql_client::{HiveSqlConfig, HiveSqlExecutor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _guard = init_tracing();

    let config = HiveSqlConfig::from_env()?;
    let executor: Arc<dyn QueryExecutor> = Arc::new(HiveSqlExecutor::new(config));
    let state = app_state::build_app_state(executor);

    let addr = std::env::var("PORT")
        .map(|port| format!("0.0.0.0:{port}"))
        .unwrap_or_else(|_| "0.0.0.0:5000".to_string());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("analytics server listening on {addr}");

    let app = routes::app_router().with_state(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "hive-analytics.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    guard
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
