//! Dependency manifest types.
//!
//! The manifest is the structured output of extraction: model files grouped
//! by a closed set of categories, plus the custom-node packages the workflow
//! requires. Its serialized form is the wire contract shared with the
//! availability checker and the provisioner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Origin package id used by built-in nodes; never reported as a dependency.
pub const CORE_PACKAGE_ID: &str = "comfy-core";

/// Version recorded for packages that do not declare one.
pub const DEFAULT_PACKAGE_VERSION: &str = "latest";

/// The closed set of model categories a workflow may depend on.
///
/// Categories serialize in snake_case and sort in declaration order, which
/// fixes the key order of serialized manifests.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Debug, Serialize, Deserialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelCategory {
    /// Full checkpoint models.
    Checkpoints,
    /// Variational autoencoders.
    Vae,
    /// LoRA adaptation weights.
    Loras,
    /// Upscaling models.
    UpscaleModels,
    /// ControlNet conditioning models.
    Controlnet,
    /// CLIP text-model weights.
    Clip,
    /// CLIP vision encoders.
    ClipVision,
    /// Standalone text encoders.
    TextEncoders,
    /// Bare diffusion / UNet weights.
    DiffusionModels,
    /// Textual-inversion embeddings.
    Embedding,
    /// Style transfer models.
    StyleModels,
    /// Hypernetwork weights.
    Hypernetworks,
    /// GLIGEN grounding models.
    Gligen,
}

impl ModelCategory {
    /// Bucket folder under `models/` holding this category.
    ///
    /// Identical to the category name except for `embedding`, whose storage
    /// folder has historically been pluralized.
    pub const fn storage_folder(&self) -> &'static str {
        match self {
            Self::Checkpoints => "checkpoints",
            Self::Vae => "vae",
            Self::Loras => "loras",
            Self::UpscaleModels => "upscale_models",
            Self::Controlnet => "controlnet",
            Self::Clip => "clip",
            Self::ClipVision => "clip_vision",
            Self::TextEncoders => "text_encoders",
            Self::DiffusionModels => "diffusion_models",
            Self::Embedding => "embeddings",
            Self::StyleModels => "style_models",
            Self::Hypernetworks => "hypernetworks",
            Self::Gligen => "gligen",
        }
    }
}

/// A required custom-node package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomNode {
    /// Package id in the node registry.
    pub node: String,
    /// Declared version, or [`DEFAULT_PACKAGE_VERSION`].
    pub version: String,
}

/// External dependencies of one workflow graph.
///
/// Invariants upheld by extraction:
/// - every category key is present, with a deduplicated, lexicographically
///   sorted sequence of resource names;
/// - `custom-nodes` carries at most one entry per package id, in the order
///   packages were first encountered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyManifest {
    /// Required model files, grouped by category.
    #[serde(default)]
    pub models: BTreeMap<ModelCategory, Vec<String>>,
    /// Required custom-node packages.
    #[serde(rename = "custom-nodes", default)]
    pub custom_nodes: Vec<CustomNode>,
}

impl DependencyManifest {
    /// Returns a manifest with every category present and empty.
    pub fn empty() -> Self {
        Self {
            models: ModelCategory::iter().map(|c| (c, Vec::new())).collect(),
            custom_nodes: Vec::new(),
        }
    }

    /// Returns whether the manifest records no dependencies at all.
    pub fn is_empty(&self) -> bool {
        self.custom_nodes.is_empty() && self.models.values().all(Vec::is_empty)
    }

    /// Resource names recorded for one category.
    pub fn models_in(&self, category: ModelCategory) -> &[String] {
        self.models.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Total number of model references across all categories.
    pub fn model_count(&self) -> usize {
        self.models.values().map(Vec::len).sum()
    }
}

impl Default for DependencyManifest {
    fn default() -> Self {
        Self::empty()
    }
}
