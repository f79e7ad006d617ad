//! Dependency availability handlers.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use depot_workflow::manifest::DependencyManifest;

use crate::handler::{Error, Result};
use crate::service::{AvailabilityReport, AvailabilityService, ServiceState};

/// Tracing target for availability handlers.
const TRACING_TARGET: &str = "depot_server::handler::availability";

/// Checks which manifest dependencies are present in storage.
async fn check_availability(
    State(availability): State<AvailabilityService>,
    Json(manifest): Json<DependencyManifest>,
) -> Result<Json<AvailabilityReport>> {
    let report = availability
        .check_manifest(&manifest)
        .await
        .map_err(Error::from)?;

    tracing::debug!(
        target: TRACING_TARGET,
        missing = report.missing_count(),
        complete = report.is_complete(),
        "availability report prepared"
    );

    Ok(Json(report))
}

/// Returns a [`Router`] with all availability routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/availability", post(check_availability))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn test_availability_reports_present_and_missing() -> anyhow::Result<()> {
        let (server, state) = create_test_server()?;
        state
            .storage
            .write("models/loras/present.safetensors", b"weights")
            .await?;
        state
            .storage
            .write("custom-nodes/pack-x/1.2.0/.complete", b"")
            .await?;

        let response = server
            .post("/availability")
            .json(&json!({
                "models": {"loras": ["present.safetensors", "absent.safetensors"]},
                "custom-nodes": [
                    {"node": "pack-x", "version": "1.2.0"},
                    {"node": "pack-y", "version": "latest"},
                ],
            }))
            .await;

        response.assert_status_ok();
        let report = response.json::<serde_json::Value>();

        assert_eq!(report["models"]["loras"]["present.safetensors"], json!(true));
        assert_eq!(report["models"]["loras"]["absent.safetensors"], json!(false));
        assert_eq!(report["custom-nodes"]["pack-x"], json!(true));
        assert_eq!(report["custom-nodes"]["pack-y"], json!(false));
        Ok(())
    }

    #[tokio::test]
    async fn test_partial_manifest_body_is_accepted() -> anyhow::Result<()> {
        let (server, _state) = create_test_server()?;

        let response = server.post("/availability").json(&json!({})).await;

        response.assert_status_ok();
        Ok(())
    }
}
