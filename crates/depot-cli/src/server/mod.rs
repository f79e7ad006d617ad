//! HTTP server startup with lifecycle management.

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "depot_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "depot_cli::server::shutdown";

mod error;
mod http_server;
mod shutdown;

use axum::Router;
pub use error::{Result, ServerError};
use http_server::serve_http;
pub(crate) use shutdown::shutdown_signal;

use crate::config::ServerConfig;

/// Starts the HTTP server with graceful shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot bind to the configured address
/// or the server encounters a fatal error during operation.
pub async fn serve(app: Router, config: ServerConfig) -> Result<()> {
    serve_http(app, config).await
}
