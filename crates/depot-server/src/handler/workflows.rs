//! Workflow analysis and persistence handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use depot_workflow::graph::Workflow;
use depot_workflow::manifest::DependencyManifest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::handler::Result;
use crate::service::{AnalysisService, ServiceState};

/// Tracing target for workflow handlers.
const TRACING_TARGET: &str = "depot_server::handler::workflows";

/// Request body for workflow upload.
#[derive(Debug, Deserialize)]
struct UploadWorkflowRequest {
    /// The workflow graph; persisted verbatim.
    workflow: Value,
    /// Extra model files to record alongside the extracted ones.
    #[serde(default)]
    required_models: Option<Vec<String>>,
}

/// Response body for workflow upload.
#[derive(Debug, Serialize)]
struct UploadWorkflowResponse {
    id: Uuid,
    manifest: DependencyManifest,
}

/// Response body for analysis listing.
#[derive(Debug, Serialize)]
struct ListAnalysesResponse {
    analyses: Vec<String>,
}

/// Analyzes a workflow without persisting anything.
///
/// Malformed workflow content degrades to an empty manifest; only a body
/// that is not JSON at all is rejected.
async fn analyze_workflow(Json(workflow): Json<Value>) -> Json<DependencyManifest> {
    let workflow = Workflow::from_value(workflow);
    let manifest = depot_workflow::extract(&workflow);

    tracing::debug!(
        target: TRACING_TARGET,
        nodes = workflow.nodes.len(),
        models = manifest.model_count(),
        custom_nodes = manifest.custom_nodes.len(),
        "workflow analyzed"
    );

    Json(manifest)
}

/// Analyzes a workflow and persists graph + manifest under a fresh id.
async fn upload_workflow(
    State(analyses): State<AnalysisService>,
    Json(request): Json<UploadWorkflowRequest>,
) -> Result<(StatusCode, Json<UploadWorkflowResponse>)> {
    let workflow = Workflow::from_value(request.workflow.clone());
    let manifest = depot_workflow::extract(&workflow);

    let id = analyses
        .store(&request.workflow, &manifest, request.required_models)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadWorkflowResponse { id, manifest }),
    ))
}

/// Re-serves the stored dependency manifest of an analysis.
async fn get_dependencies(
    State(analyses): State<AnalysisService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    Ok(Json(analyses.load_dependencies(id).await?))
}

/// Lists the ids of all stored analyses.
async fn list_analyses(
    State(analyses): State<AnalysisService>,
) -> Result<Json<ListAnalysesResponse>> {
    Ok(Json(ListAnalysesResponse {
        analyses: analyses.list().await?,
    }))
}

/// Returns a [`Router`] with all workflow routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/workflows", post(upload_workflow).get(list_analyses))
        .route("/workflows/analyze", post(analyze_workflow))
        .route("/workflows/{id}/dependencies", get(get_dependencies))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn test_analyze_returns_manifest() -> anyhow::Result<()> {
        let (server, _state) = create_test_server()?;

        let response = server
            .post("/workflows/analyze")
            .json(&json!({
                "nodes": [
                    {"type": "CheckpointLoaderSimple",
                     "widgets_values": ["flux1-dev.safetensors"]},
                ]
            }))
            .await;

        response.assert_status_ok();
        let manifest = response.json::<serde_json::Value>();
        assert_eq!(manifest["models"]["checkpoints"], json!(["flux1-dev.safetensors"]));
        assert_eq!(manifest["custom-nodes"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_analyze_tolerates_malformed_workflows() -> anyhow::Result<()> {
        let (server, _state) = create_test_server()?;

        let response = server
            .post("/workflows/analyze")
            .json(&json!({"nodes": "not an array"}))
            .await;

        response.assert_status_ok();
        let manifest = response.json::<serde_json::Value>();
        assert_eq!(manifest["models"]["checkpoints"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_then_fetch_dependencies() -> anyhow::Result<()> {
        let (server, _state) = create_test_server()?;

        let upload = server
            .post("/workflows")
            .json(&json!({
                "workflow": {
                    "nodes": [
                        {"type": "VAELoader", "widgets_values": ["ae.safetensors"]},
                    ]
                },
                "required_models": ["extra.safetensors"],
            }))
            .await;

        upload.assert_status(axum::http::StatusCode::CREATED);
        let body = upload.json::<serde_json::Value>();
        let id = body["id"].as_str().unwrap().to_string();

        let fetched = server.get(&format!("/workflows/{id}/dependencies")).await;
        fetched.assert_status_ok();

        let stored = fetched.json::<serde_json::Value>();
        assert_eq!(stored["models"]["vae"], json!(["ae.safetensors"]));
        assert_eq!(stored["required_models"], json!(["extra.safetensors"]));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_analysis_is_404() -> anyhow::Result<()> {
        let (server, _state) = create_test_server()?;

        let response = server
            .get("/workflows/00000000-0000-0000-0000-000000000000/dependencies")
            .await;

        response.assert_status(axum::http::StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_listing_contains_uploaded_ids() -> anyhow::Result<()> {
        let (server, _state) = create_test_server()?;

        let upload = server
            .post("/workflows")
            .json(&json!({"workflow": {"nodes": []}}))
            .await;
        let id = upload.json::<serde_json::Value>()["id"]
            .as_str()
            .unwrap()
            .to_string();

        let listing = server.get("/workflows").await;
        listing.assert_status_ok();

        let body = listing.json::<serde_json::Value>();
        let analyses = body["analyses"].as_array().unwrap();
        assert!(analyses.iter().any(|entry| entry == &json!(id)));
        Ok(())
    }
}
