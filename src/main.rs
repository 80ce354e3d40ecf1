use anyhow::{Context, Result};
use clap::Parser;
use signstream::{
    corrector_from_config, create_router, AppState, CentroidModel, Config, SignDetector,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "signstream", about = "ASL fingerspelling to text streaming service")]
struct Args {
    /// Configuration file (TOML, extension omitted)
    #[arg(long, default_value = "config/signstream")]
    config: String,

    /// Override the bind address from the config file
    #[arg(long)]
    bind: Option<String>,

    /// Override the port from the config file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("Starting {} v0.1.0", cfg.service.name);
    info!(
        "Stability threshold: {}, window: {}ms, confirm delay: {}ms",
        cfg.detection.stability_threshold,
        cfg.detection.stability_window_ms,
        cfg.detection.confirm_delay_ms
    );

    let classifier = Arc::new(
        CentroidModel::load(&cfg.signs.model_path)
            .context("Failed to load classifier model")?,
    );

    let corrector: Arc<dyn signstream::TextCorrector> =
        corrector_from_config(&cfg.correction)?.into();

    let detector = Arc::new(SignDetector::new(cfg.detection.clone(), corrector));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let state = AppState::new(Arc::new(cfg), detector, classifier);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
        return;
    }
    info!("Received shutdown signal");
}
