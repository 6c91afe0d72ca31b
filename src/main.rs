use clap::Parser;
use kiezplaces::api;
use kiezplaces::config::Settings;
use kiezplaces::engine::Engine;
use kiezplaces::loader;
use log::info;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::parse();
    info!(
        "[BOOT] max_prefix_length={} min_completion_count={} min_lev={} distance_cut={} cache_ttl={}s port={}",
        settings.max_prefix_length,
        settings.min_completion_count,
        settings.min_lev,
        settings.distance_cut,
        settings.cache_ttl_secs,
        settings.port
    );

    let corpus = loader::load_files(
        &settings.districts_csv,
        &settings.streets_csv,
        &settings.locations_csv,
        &settings.housenumbers_csv,
    )?;

    let engine = Arc::new(Engine::new(corpus, settings.engine_config()));
    let snapshot = engine.metrics_snapshot();
    info!(
        "[BOOT] corpus: {} streets, {} locations, {} house numbers, {} prefixes",
        snapshot.street_count,
        snapshot.location_count,
        snapshot.house_number_count,
        snapshot.prefix_count
    );

    let app = api::router(engine);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", settings.port)).await?;
    info!("[BOOT] listening on http://localhost:{}", settings.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("[BOOT] shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("[BOOT] shutdown signal received");
}
