//! Storage layout of the depot bucket.
//!
//! The layout is a fixed contract shared with the provisioner and every
//! tool that reads the bucket directly:
//!
//! ```text
//! models/{folder}/{name}                    model files, one folder per category
//! custom-nodes/{package}/{version}/         installed package trees
//! custom-nodes/{package}/{version}/.complete  marker written after a full upload
//! workflows/{id}/workflow.json              uploaded source graph
//! workflows/{id}/dependencies.json          extracted manifest
//! provision/{id}.json                       recorded provisioning requests
//! ```

use depot_workflow::manifest::ModelCategory;
use uuid::Uuid;

/// Prefix for model files.
pub const MODELS_PREFIX: &str = "models";

/// Prefix for installed custom-node packages.
pub const CUSTOM_NODES_PREFIX: &str = "custom-nodes";

/// Prefix for stored workflow analyses.
pub const WORKFLOWS_PREFIX: &str = "workflows";

/// Prefix for recorded provisioning requests.
pub const PROVISION_PREFIX: &str = "provision";

/// Marker object the provisioner writes once a package upload completes.
///
/// Package presence is approximated by this marker: a partially uploaded
/// package tree without it does not count as available.
pub const COMPLETION_MARKER: &str = ".complete";

/// Key of a model file in its category folder.
pub fn model_key(category: ModelCategory, name: &str) -> String {
    format!("{MODELS_PREFIX}/{}/{name}", category.storage_folder())
}

/// Prefix of an installed package tree.
pub fn package_prefix(node: &str, version: &str) -> String {
    format!("{CUSTOM_NODES_PREFIX}/{node}/{version}/")
}

/// Key of the completion marker of an installed package.
pub fn package_marker_key(node: &str, version: &str) -> String {
    format!("{}{COMPLETION_MARKER}", package_prefix(node, version))
}

/// Key of a stored workflow graph.
pub fn workflow_key(id: Uuid) -> String {
    format!("{WORKFLOWS_PREFIX}/{id}/workflow.json")
}

/// Key of a stored dependency manifest.
pub fn dependencies_key(id: Uuid) -> String {
    format!("{WORKFLOWS_PREFIX}/{id}/dependencies.json")
}

/// Key of a recorded provisioning request.
pub fn provision_request_key(id: Uuid) -> String {
    format!("{PROVISION_PREFIX}/{id}.json")
}
