use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taxi_fare_api::{app, config::Settings, AppState, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().context("Failed to load configuration")?;

    // RUST_LOG wins over LOG_LEVEL when both are set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "taxi_fare_api={0},tower_http={0}",
            settings.log_level
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting NYC Taxi Fare Prediction API v{} ({})",
        VERSION,
        settings.environment
    );

    let state = AppState::new(settings.clone());

    let health = state.service.health_check();
    if health.is_healthy() {
        tracing::info!(
            "Fare engine ready: sample trip priced at ${:.2}",
            health.test_prediction.unwrap_or_default()
        );
    } else {
        tracing::warn!("Fare engine health check failed: {:?}", health.error);
    }

    let listener = TcpListener::bind(settings.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_address()))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down NYC Taxi Fare Prediction API");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
