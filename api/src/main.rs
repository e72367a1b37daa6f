/// Nuit API Server
///
/// Serves the download page and `GET /api/download`, which resolves a YouTube
/// watch URL through yt-dlp and streams the media back as an MP4 attachment.
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use nuit_api::config::AppConfig;
use nuit_api::{router, AppState};
use nuit_downloader::YtDlpResolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nuit_api=info,nuit_downloader=info,tower_http=info".into()),
        )
        .init();

    // Config
    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(
        "Extractor: {} {} (metadata timeout {:?}, open timeout {:?})",
        config.resolver.program,
        config.resolver.program_args.join(" "),
        config.resolver.metadata_timeout,
        config.resolver.open_timeout
    );

    let static_dir = if config.static_dir.is_dir() {
        info!("Serving download page from {}", config.static_dir.display());
        Some(config.static_dir.as_path())
    } else {
        warn!(
            "Static directory {} not found, download page disabled",
            config.static_dir.display()
        );
        None
    };

    // App state
    let resolver = YtDlpResolver::new(config.resolver.clone());
    let state = Arc::new(AppState::new(Arc::new(resolver)));
    let app = router(state, static_dir);

    // Bind
    let addr = config.bind_addr();
    info!("Nuit API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Nuit API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
