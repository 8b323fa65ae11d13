use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use dusys::logging::{init_tracing, shutdown_tracer};
use dusys::metrics::{init_metrics, metrics_router};
use dusys::router::init_router;
use dusys::state::init_app_state;
use dusys_config::Settings;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run().await {
        error!(error = ?e, "Server stopped");
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;

    init_tracing(&settings.observability).context("failed to initialize logging")?;
    let metrics = init_metrics(&settings.observability).context("failed to initialize metrics")?;

    let bind_address = settings.server.bind_address.clone();
    let state = init_app_state(settings).await?;

    let mut app = init_router(state);
    if let Some(handle) = metrics {
        app = app.merge(metrics_router(handle));
    }

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;
    info!(address = %bind_address, "Server running");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
