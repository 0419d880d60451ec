use anyhow::Context;
use ondacast::CastSink;
use ondadrive::DriveCatalogClient;
use ondaplayer::SessionController;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod schedule;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration ==========

    let config = ondaconfig::get_config();
    init_tracing(&config.get_log_min_level());

    info!("📻 Starting Onda Radio...");
    info!(config_dir = %config.directory(), "Configuration loaded");

    info!("📂 Setting up the drive catalog client...");
    let catalog = Arc::new(
        DriveCatalogClient::from_config()
            .context("Drive catalog configuration is incomplete")?,
    );

    // ========== PHASE 2 : Transport et sessions ==========

    let sink = CastSink::new(config.get_stream_byte_rate());
    let controller = Arc::new(
        SessionController::new(catalog, sink.clone()).with_volume(config.get_stream_volume()),
    );
    let duration_minutes = config.get_stream_duration_minutes();
    info!(
        "🎚️ Relay sessions run for {} minutes at volume {}",
        duration_minutes,
        config.get_stream_volume()
    );

    info!("📅 Registering the weekly schedule...");
    let slots = schedule::load_slots(&config);
    info!("✅ {} schedule slot(s) registered", slots.len());
    schedule::spawn(controller.clone(), slots, duration_minutes);

    // ========== PHASE 3 : Serveur HTTP ==========

    let app = ondacast::router(sink).merge(api::router(api::ApiState {
        controller: controller.clone(),
        duration_minutes,
    }));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.get_http_port()));
    info!("🌐 Starting HTTP server on {addr}...");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {addr}"))?;

    info!("✅ Onda Radio is ready!");
    info!("Press Ctrl+C to stop...");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(controller))
        .await
        .context("HTTP server failed")?;

    info!("👋 Onda Radio stopped");
    Ok(())
}

/// Honor RUST_LOG when set, fall back to the configured minimum level
fn init_tracing(min_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(min_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Wait for Ctrl+C, then tear the running session down before the
/// server drains its connections
async fn shutdown_signal(controller: Arc<SessionController>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl+C");
        return;
    }
    info!("Received Ctrl+C, shutting down...");
    controller.stop_stream().await;
}
