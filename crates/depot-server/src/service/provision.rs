//! Provisioning request recording.
//!
//! The depot never installs anything itself. It records which custom-node
//! packages a workflow needs; an external provisioner picks requests up,
//! installs each package, uploads the tree to
//! `custom-nodes/{package}/{version}/`, and writes the completion marker.

use depot_opendal::StorageBackend;
use depot_workflow::manifest::{CustomNode, DependencyManifest};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;
use crate::service::paths;

/// Tracing target for provisioning operations.
const TRACING_TARGET: &str = "depot_server::service::provision";

/// A recorded provisioning request.
///
/// Only the `custom-nodes` list is contractual input to the provisioner;
/// the rest is bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    /// Request id; also names the stored request object.
    pub id: Uuid,
    /// When the request was recorded.
    pub requested_at: Timestamp,
    /// Packages to install and upload.
    #[serde(rename = "custom-nodes")]
    pub custom_nodes: Vec<CustomNode>,
}

/// Records provisioning requests in the bucket.
#[derive(Debug, Clone)]
pub struct ProvisionService {
    storage: StorageBackend,
}

impl ProvisionService {
    /// Creates a new provisioning service.
    pub fn new(storage: StorageBackend) -> Self {
        Self { storage }
    }

    /// Records a provisioning request for the manifest's custom nodes.
    ///
    /// The request is written even when the package list is empty, so a
    /// caller can observe that a run was requested.
    pub async fn request(&self, manifest: &DependencyManifest) -> Result<ProvisionRequest> {
        let request = ProvisionRequest {
            id: Uuid::now_v7(),
            requested_at: Timestamp::now(),
            custom_nodes: manifest.custom_nodes.clone(),
        };

        self.storage
            .write(
                &paths::provision_request_key(request.id),
                &serde_json::to_vec(&request)?,
            )
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            request_id = %request.id,
            packages = request.custom_nodes.len(),
            "provisioning request recorded"
        );

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_persists_custom_nodes() -> anyhow::Result<()> {
        let storage = StorageBackend::memory()?;
        let provision = ProvisionService::new(storage.clone());

        let mut manifest = DependencyManifest::empty();
        manifest.custom_nodes.push(CustomNode {
            node: "pack-x".to_string(),
            version: "1.2.0".to_string(),
        });

        let request = provision.request(&manifest).await?;

        let bytes = storage
            .read(&paths::provision_request_key(request.id))
            .await?;
        let stored: ProvisionRequest = serde_json::from_slice(&bytes)?;

        assert_eq!(stored, request);
        assert_eq!(stored.custom_nodes.len(), 1);
        assert_eq!(stored.custom_nodes[0].node, "pack-x");
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_manifest_still_records_a_request() -> anyhow::Result<()> {
        let provision = ProvisionService::new(StorageBackend::memory()?);

        let request = provision.request(&DependencyManifest::empty()).await?;
        assert!(request.custom_nodes.is_empty());
        Ok(())
    }
}
