//! System health monitoring handlers.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use depot_opendal::StorageBackend;
use serde::Serialize;

use crate::handler::{Error, Result};
use crate::service::ServiceState;

/// Tracing target for monitor handlers.
const TRACING_TARGET: &str = "depot_server::handler::monitors";

/// Response body for health checks.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: String,
}

/// Reports liveness and storage reachability.
async fn health_status(State(storage): State<StorageBackend>) -> Result<Json<HealthResponse>> {
    storage.check().await.map_err(Error::from)?;

    tracing::debug!(
        target: TRACING_TARGET,
        backend = %storage.backend_type(),
        "health check passed"
    );

    Ok(Json(HealthResponse {
        status: "ok",
        backend: storage.backend_type().to_string(),
    }))
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn test_health_reports_backend() -> anyhow::Result<()> {
        let (server, _state) = create_test_server()?;

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["backend"], json!("memory"));
        Ok(())
    }
}
