//! Provisioning trigger handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use depot_workflow::manifest::DependencyManifest;
use serde::Serialize;
use uuid::Uuid;

use crate::handler::Result;
use crate::service::{ProvisionService, ServiceState};

/// Tracing target for provisioning handlers.
const TRACING_TARGET: &str = "depot_server::handler::provision";

/// Response body for a recorded provisioning request.
#[derive(Debug, Serialize)]
struct ProvisionResponse {
    id: Uuid,
    packages: usize,
}

/// Records a provisioning request for the manifest's custom nodes.
///
/// The request is handed off to the external provisioner; this endpoint
/// neither awaits nor reports on the installation itself.
async fn request_provision(
    State(provision): State<ProvisionService>,
    Json(manifest): Json<DependencyManifest>,
) -> Result<(StatusCode, Json<ProvisionResponse>)> {
    let request = provision.request(&manifest).await?;

    tracing::info!(
        target: TRACING_TARGET,
        request_id = %request.id,
        packages = request.custom_nodes.len(),
        "provisioning requested"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ProvisionResponse {
            id: request.id,
            packages: request.custom_nodes.len(),
        }),
    ))
}

/// Returns a [`Router`] with all provisioning routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/provision", post(request_provision))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn test_provision_is_accepted_and_recorded() -> anyhow::Result<()> {
        let (server, state) = create_test_server()?;

        let response = server
            .post("/provision")
            .json(&json!({
                "custom-nodes": [{"node": "pack-x", "version": "1.2.0"}],
            }))
            .await;

        response.assert_status(axum::http::StatusCode::ACCEPTED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["packages"], json!(1));

        let id = body["id"].as_str().unwrap();
        let stored = state.storage.read(&format!("provision/{id}.json")).await?;
        let request: serde_json::Value = serde_json::from_slice(&stored)?;
        assert_eq!(request["custom-nodes"][0]["node"], json!("pack-x"));
        Ok(())
    }
}
