//! Dependency availability checking.

use std::collections::BTreeMap;

use depot_opendal::{StorageBackend, StorageResult};
use depot_workflow::manifest::{DependencyManifest, ModelCategory};
use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};

use crate::service::paths;

/// Default bound on concurrent storage existence lookups.
pub const DEFAULT_CONCURRENT_CHECKS: usize = 16;

/// Tracing target for availability operations.
const TRACING_TARGET: &str = "depot_server::service::availability";

/// Per-item presence of manifest dependencies in storage.
///
/// Keyed identically to the manifest, with boolean leaves. An entry absent
/// from the report means "unknown / still checking", never "missing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// Presence of model files, by category and name.
    pub models: BTreeMap<ModelCategory, BTreeMap<String, bool>>,
    /// Presence of installed custom-node packages, by package id.
    #[serde(rename = "custom-nodes")]
    pub custom_nodes: BTreeMap<String, bool>,
}

impl AvailabilityReport {
    /// Returns whether every checked item is present in storage.
    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }

    /// Number of checked items missing from storage.
    pub fn missing_count(&self) -> usize {
        let missing_models = self
            .models
            .values()
            .flat_map(BTreeMap::values)
            .filter(|present| !**present)
            .count();
        let missing_packages = self
            .custom_nodes
            .values()
            .filter(|present| !**present)
            .count();

        missing_models + missing_packages
    }
}

/// One pending existence lookup.
enum Target {
    Model(ModelCategory, String),
    Package(String),
}

/// Checks manifest dependencies against the storage bucket.
#[derive(Debug, Clone)]
pub struct AvailabilityService {
    storage: StorageBackend,
    concurrency: usize,
}

impl AvailabilityService {
    /// Creates a new availability service.
    pub fn new(storage: StorageBackend, concurrent_checks: usize) -> Self {
        Self {
            storage,
            concurrency: concurrent_checks.max(1),
        }
    }

    /// Checks every manifest item for presence in storage.
    ///
    /// Model files are checked at their category folder; packages are
    /// checked via their completion marker. Lookups run concurrently,
    /// bounded by the configured limit.
    pub async fn check_manifest(
        &self,
        manifest: &DependencyManifest,
    ) -> StorageResult<AvailabilityReport> {
        let mut lookups = Vec::with_capacity(manifest.model_count() + manifest.custom_nodes.len());

        for (&category, names) in &manifest.models {
            for name in names {
                lookups.push((
                    Target::Model(category, name.clone()),
                    paths::model_key(category, name),
                ));
            }
        }

        for package in &manifest.custom_nodes {
            lookups.push((
                Target::Package(package.node.clone()),
                paths::package_marker_key(&package.node, &package.version),
            ));
        }

        let checked = lookups.len();
        let results = stream::iter(lookups)
            .map(|(target, key)| {
                let storage = self.storage.clone();
                async move { (target, storage.exists(&key).await) }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut report = AvailabilityReport {
            models: manifest
                .models
                .keys()
                .map(|&category| (category, BTreeMap::new()))
                .collect(),
            custom_nodes: BTreeMap::new(),
        };

        for (target, exists) in results {
            let exists = exists?;
            match target {
                Target::Model(category, name) => {
                    report
                        .models
                        .entry(category)
                        .or_default()
                        .insert(name, exists);
                }
                Target::Package(node) => {
                    report.custom_nodes.insert(node, exists);
                }
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            checked = checked,
            missing = report.missing_count(),
            "manifest availability checked"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use depot_workflow::manifest::CustomNode;

    use super::*;

    fn manifest_with(category: ModelCategory, names: &[&str]) -> DependencyManifest {
        let mut manifest = DependencyManifest::empty();
        manifest
            .models
            .insert(category, names.iter().map(|n| n.to_string()).collect());
        manifest
    }

    #[tokio::test]
    async fn test_empty_manifest_reports_all_categories() -> anyhow::Result<()> {
        let storage = StorageBackend::memory()?;
        let service = AvailabilityService::new(storage, DEFAULT_CONCURRENT_CHECKS);

        let report = service.check_manifest(&DependencyManifest::empty()).await?;

        assert_eq!(report.models.len(), 13);
        assert!(report.models.values().all(BTreeMap::is_empty));
        assert!(report.custom_nodes.is_empty());
        assert!(report.is_complete());
        Ok(())
    }

    #[tokio::test]
    async fn test_present_and_missing_models_are_distinguished() -> anyhow::Result<()> {
        let storage = StorageBackend::memory()?;
        storage
            .write("models/checkpoints/present.ckpt", b"weights")
            .await?;

        let service = AvailabilityService::new(storage, DEFAULT_CONCURRENT_CHECKS);
        let manifest = manifest_with(ModelCategory::Checkpoints, &["present.ckpt", "absent.ckpt"]);

        let report = service.check_manifest(&manifest).await?;
        let checkpoints = &report.models[&ModelCategory::Checkpoints];

        assert!(checkpoints["present.ckpt"]);
        assert!(!checkpoints["absent.ckpt"]);
        assert_eq!(report.missing_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_embedding_checks_use_plural_folder() -> anyhow::Result<()> {
        let storage = StorageBackend::memory()?;
        storage.write("models/embeddings/neg.pt", b"x").await?;

        let service = AvailabilityService::new(storage, DEFAULT_CONCURRENT_CHECKS);
        let manifest = manifest_with(ModelCategory::Embedding, &["neg.pt"]);

        let report = service.check_manifest(&manifest).await?;
        assert!(report.models[&ModelCategory::Embedding]["neg.pt"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_package_presence_requires_completion_marker() -> anyhow::Result<()> {
        let storage = StorageBackend::memory()?;
        // Package tree without a marker does not count as available.
        storage
            .write("custom-nodes/partial/1.0/nodes.py", b"...")
            .await?;
        storage
            .write("custom-nodes/done/2.0/.complete", b"")
            .await?;

        let service = AvailabilityService::new(storage, DEFAULT_CONCURRENT_CHECKS);
        let mut manifest = DependencyManifest::empty();
        manifest.custom_nodes = vec![
            CustomNode {
                node: "partial".to_string(),
                version: "1.0".to_string(),
            },
            CustomNode {
                node: "done".to_string(),
                version: "2.0".to_string(),
            },
        ];

        let report = service.check_manifest(&manifest).await?;

        assert!(!report.custom_nodes["partial"]);
        assert!(report.custom_nodes["done"]);
        Ok(())
    }
}
