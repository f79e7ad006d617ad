//! Stored workflow analyses.
//!
//! An analysis is the pair of objects written when a workflow is uploaded:
//! the source graph verbatim and the manifest extracted from it. Both live
//! under `workflows/{id}/` keyed by a fresh UUIDv7, so listing sorts by
//! upload time.

use depot_opendal::{StorageBackend, StorageError};
use depot_workflow::manifest::DependencyManifest;
use serde_json::Value;
use uuid::Uuid;

use crate::service::paths;
use crate::{Error, Result};

/// Tracing target for analysis persistence.
const TRACING_TARGET: &str = "depot_server::service::analyses";

/// Persists and re-serves workflow analyses.
#[derive(Debug, Clone)]
pub struct AnalysisService {
    storage: StorageBackend,
}

impl AnalysisService {
    /// Creates a new analysis service.
    pub fn new(storage: StorageBackend) -> Self {
        Self { storage }
    }

    /// Stores a workflow graph together with its extracted manifest.
    ///
    /// The graph is persisted verbatim; the manifest JSON is extended with
    /// the caller-supplied `required_models` list when one is given.
    /// Returns the fresh analysis id.
    pub async fn store(
        &self,
        workflow: &Value,
        manifest: &DependencyManifest,
        required_models: Option<Vec<String>>,
    ) -> Result<Uuid> {
        let id = Uuid::now_v7();

        let mut dependencies = serde_json::to_value(manifest)?;
        if let Some(required) = required_models
            && let Some(object) = dependencies.as_object_mut()
        {
            object.insert("required_models".to_string(), Value::from(required));
        }

        self.storage
            .write(&paths::workflow_key(id), &serde_json::to_vec(workflow)?)
            .await?;
        self.storage
            .write(
                &paths::dependencies_key(id),
                &serde_json::to_vec(&dependencies)?,
            )
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            analysis_id = %id,
            models = manifest.model_count(),
            custom_nodes = manifest.custom_nodes.len(),
            "workflow analysis stored"
        );

        Ok(id)
    }

    /// Loads the stored dependency manifest of an analysis.
    ///
    /// Returned as raw JSON because stored manifests may carry the
    /// `required_models` extension the typed manifest does not model.
    pub async fn load_dependencies(&self, id: Uuid) -> Result<Value> {
        let bytes = self
            .storage
            .read(&paths::dependencies_key(id))
            .await
            .map_err(|err| match err {
                StorageError::NotFound(_) => Error::AnalysisNotFound(id),
                other => Error::Storage(other),
            })?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Lists the ids of all stored analyses.
    pub async fn list(&self) -> Result<Vec<String>> {
        let prefix = format!("{}/", paths::WORKFLOWS_PREFIX);
        let entries = self.storage.list(&prefix).await?;

        let mut ids: Vec<String> = entries
            .into_iter()
            .filter_map(|entry| {
                entry
                    .strip_prefix(&prefix)
                    .map(|rest| rest.trim_end_matches('/').to_string())
            })
            .filter(|id| !id.is_empty())
            .collect();

        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn service() -> AnalysisService {
        AnalysisService::new(StorageBackend::memory().expect("memory backend"))
    }

    #[tokio::test]
    async fn test_store_and_load_round_trip() -> anyhow::Result<()> {
        let analyses = service();
        let manifest = DependencyManifest::empty();

        let id = analyses
            .store(&json!({"nodes": []}), &manifest, None)
            .await?;
        let stored = analyses.load_dependencies(id).await?;

        assert_eq!(stored, serde_json::to_value(&manifest)?);
        Ok(())
    }

    #[tokio::test]
    async fn test_required_models_are_attached() -> anyhow::Result<()> {
        let analyses = service();

        let id = analyses
            .store(
                &json!({}),
                &DependencyManifest::empty(),
                Some(vec!["extra.safetensors".to_string()]),
            )
            .await?;

        let stored = analyses.load_dependencies(id).await?;
        assert_eq!(stored["required_models"], json!(["extra.safetensors"]));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_analysis_is_not_found() {
        let analyses = service();

        let result = analyses.load_dependencies(Uuid::nil()).await;
        assert!(matches!(result, Err(Error::AnalysisNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_returns_stored_ids() -> anyhow::Result<()> {
        let analyses = service();

        let first = analyses
            .store(&json!({}), &DependencyManifest::empty(), None)
            .await?;
        let second = analyses
            .store(&json!({}), &DependencyManifest::empty(), None)
            .await?;

        let ids = analyses.list().await?;
        assert!(ids.contains(&first.to_string()));
        assert!(ids.contains(&second.to_string()));
        Ok(())
    }
}
