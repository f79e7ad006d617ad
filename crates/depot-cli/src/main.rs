#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use depot_server::middleware::{RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt};
use depot_server::service::ServiceState;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "depot_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "depot_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "depot_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.validate()?;
    cli.log();

    let state = create_service_state(&cli)?;
    let router = create_router(state, &cli);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let config = cli.storage.to_service_config()?;

    ServiceState::from_config(config).context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - enforces request timeouts
/// 2. Observability - tracing spans per request
/// 3. CORS - cross-origin policy
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    depot_server::handler::routes()
        .with_state(state)
        .with_cors(&cli.server.cors_allowed_origins)
        .with_observability()
        .with_recovery(Duration::from_secs(cli.server.request_timeout))
}
