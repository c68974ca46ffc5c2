use anyhow::{Context as _, Result};
use mindmap_server::logging::{SERVER_LOG_FILTER, init_logging};
use mindmap_server::{AppBootstrap, routes};

use super::Context;

pub async fn run(context: Context, host: Option<String>, port: Option<u16>) -> Result<()> {
    let logs_dir = context.paths.logs_dir().ok();
    let _guard = init_logging(SERVER_LOG_FILTER, logs_dir.as_deref())?;

    let mut config = context.config;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let bootstrap = AppBootstrap::build(&config)?;
    let app = routes::router(bootstrap.app_state);

    let bind = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {bind}"))?;
    tracing::info!("[Server] Listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    tracing::info!("[Server] Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[Server] Failed to listen for shutdown signal: {}", e);
    }
}
