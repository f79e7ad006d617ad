//! HTTP server startup and lifecycle management.

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::server::{
    Result, ServerError, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP, shutdown_signal,
};

/// Starts an HTTP server with graceful shutdown.
///
/// Binds to the configured address and serves requests until a shutdown
/// signal is received; in-flight requests get the configured grace period.
pub(crate) async fn serve_http(app: Router, config: ServerConfig) -> Result<()> {
    let addr = config.server_addr();

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(source) => {
            tracing::error!(
                target: TRACING_TARGET_STARTUP,
                addr = %addr,
                error = %source,
                "failed to bind to address"
            );
            return Err(ServerError::Bind { addr, source });
        }
    };

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %addr,
        "server is ready and listening for connections"
    );

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "server is bound to all interfaces; ensure firewall rules are properly configured"
        );
    }

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %err,
                "server encountered an error"
            );
            ServerError::Runtime(err)
        })?;

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, "server shut down gracefully");
    Ok(())
}
