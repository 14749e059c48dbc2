//! Tollgate HTTP Server
//!
//! Main entry point for the sample ingestion API.

use std::{path::PathBuf, time::Duration};

use infrastructure::{AppComponents, AppConfig, init_tracing};
use presentation_http::{AppState, routes};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

/// Environment variable naming an explicit configuration file
const CONFIG_PATH_ENV: &str = "TOLLGATE_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref());

    init_tracing(&config.telemetry, None)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    if let Err(problems) = config.validate() {
        for problem in &problems {
            warn!(%problem, "Configuration problem");
        }
        anyhow::bail!("Invalid configuration ({} problem(s))", problems.len());
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.path,
        "Configuration loaded"
    );

    let components = AppComponents::build(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize components: {e}"))?;

    let app = routes::create_router_with_limit(
        AppState::from(components),
        config.server.max_body_size_json_bytes,
    );

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    // In-flight samples finish under their subject lock before the listener closes.
    info!("Waiting up to {:?} for connections to close", timeout);
}
