//! Dependency extraction over workflow graphs.
//!
//! [`extract`] walks a [`Workflow`] once per assembly rule and projects it
//! into a [`DependencyManifest`]. The walk is stateless and infallible: a
//! node that is missing fields, carries wrong-typed values, or has an
//! unknown type contributes nothing and never aborts the scan.
//!
//! The thirteen model categories are assembled from a declarative table
//! rather than per-category code. Each category merges two kinds of source:
//! positional widget values read at a fixed index from nodes of any listed
//! type alias, and `properties.models` entries tagged with the category's
//! directory. The alias lists carry every historical node-type spelling that
//! denotes the same logical loader.

use std::collections::BTreeSet;

use serde_json::Value;
use strum::IntoEnumIterator;

use crate::TRACING_TARGET;
use crate::graph::{Workflow, WorkflowNode};
use crate::manifest::{
    CORE_PACKAGE_ID, CustomNode, DEFAULT_PACKAGE_VERSION, DependencyManifest, ModelCategory,
};

/// Positional-argument source: nodes of any listed type contribute the
/// widget value at `index`.
struct PositionalRule {
    types: &'static [&'static str],
    index: usize,
}

/// Property-array source: nodes of exactly `node_type` contribute the names
/// of `properties.models` entries whose directory equals `directory`.
struct PropertyRule {
    node_type: &'static str,
    directory: &'static str,
}

/// How one model category is assembled from a workflow graph.
struct CategoryRule {
    category: ModelCategory,
    positional: &'static [PositionalRule],
    property: &'static [PropertyRule],
}

/// Assembly table for the thirteen model categories.
///
/// The historical type names must be preserved verbatim; renaming one
/// silently stops matching workflows exported by older frontends.
static CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: ModelCategory::Checkpoints,
        positional: &[PositionalRule {
            types: &[
                "CheckpointLoaderSimple",
                "CheckpointLoader",
                "unCLIPCheckpointLoader",
            ],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::Vae,
        positional: &[PositionalRule {
            types: &["VAELoader"],
            index: 0,
        }],
        property: &[PropertyRule {
            node_type: "VAELoader",
            directory: "vae",
        }],
    },
    CategoryRule {
        category: ModelCategory::Loras,
        positional: &[PositionalRule {
            types: &["LoraLoader", "LoraLoaderModelOnly"],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::UpscaleModels,
        positional: &[PositionalRule {
            types: &["UpscaleModelLoader"],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::Controlnet,
        positional: &[PositionalRule {
            types: &["ControlNetLoader"],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::Clip,
        positional: &[PositionalRule {
            types: &["CLIPLoader", "CLIPLoaderGGUF"],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::ClipVision,
        positional: &[PositionalRule {
            types: &["CLIPVisionLoader"],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::TextEncoders,
        positional: &[],
        property: &[PropertyRule {
            node_type: "DualCLIPLoader",
            directory: "text_encoders",
        }],
    },
    CategoryRule {
        category: ModelCategory::DiffusionModels,
        positional: &[PositionalRule {
            types: &[
                "UNETLoader",
                "UNetLoader",
                "UnetLoaderGGUF",
                "UnetLoaderGGUFAdvanced",
            ],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::Embedding,
        positional: &[PositionalRule {
            types: &["EmbeddingLoader"],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::StyleModels,
        positional: &[PositionalRule {
            types: &["StyleModelLoader"],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::Hypernetworks,
        positional: &[PositionalRule {
            types: &["HypernetworkLoader"],
            index: 0,
        }],
        property: &[],
    },
    CategoryRule {
        category: ModelCategory::Gligen,
        positional: &[PositionalRule {
            types: &["GLIGENLoader"],
            index: 0,
        }],
        property: &[],
    },
];

/// Extracts the dependency manifest of a workflow graph.
///
/// Pure projection: the input is never mutated, no state is retained, and
/// repeated runs over the same graph produce an identical manifest.
pub fn extract(workflow: &Workflow) -> DependencyManifest {
    let manifest = DependencyManifest {
        models: ModelCategory::iter()
            .map(|category| (category, collect_category(workflow, category)))
            .collect(),
        custom_nodes: collect_custom_nodes(workflow),
    };

    tracing::debug!(
        target: TRACING_TARGET,
        nodes = workflow.nodes.len(),
        models = manifest.model_count(),
        custom_nodes = manifest.custom_nodes.len(),
        "workflow dependencies extracted"
    );

    manifest
}

/// Merges every source of one category into a sorted, deduplicated list.
fn collect_category(workflow: &Workflow, category: ModelCategory) -> Vec<String> {
    let mut names = BTreeSet::new();

    for rule in CATEGORY_RULES.iter().filter(|r| r.category == category) {
        for source in rule.positional {
            collect_positional(workflow, source, &mut names);
        }
        for source in rule.property {
            collect_property(workflow, source, &mut names);
        }
    }

    names.into_iter().collect()
}

/// Collects widget values at a fixed index from nodes matching an alias set.
fn collect_positional(workflow: &Workflow, rule: &PositionalRule, names: &mut BTreeSet<String>) {
    for node in workflow.nodes.iter().filter(|n| matches_type(n, rule.types)) {
        let value = node
            .widgets_values
            .as_ref()
            .and_then(|values| values.get(rule.index));

        if let Some(name) = value.and_then(scalar_to_string) {
            names.insert(name);
        }
    }
}

/// Collects `properties.models` names tagged with the expected directory.
fn collect_property(workflow: &Workflow, rule: &PropertyRule, names: &mut BTreeSet<String>) {
    let nodes = workflow
        .nodes
        .iter()
        .filter(|n| matches_type(n, &[rule.node_type]));

    for node in nodes {
        let Some(properties) = node.properties.as_ref() else {
            continue;
        };

        for model in &properties.models {
            if model.directory.as_deref() == Some(rule.directory)
                && let Some(name) = model.name.as_deref()
                && !name.is_empty()
            {
                names.insert(name.to_string());
            }
        }
    }
}

/// Collects custom-node packages, unique by package id.
///
/// The first node declaring a package id wins; a later node declaring the
/// same id with a different version is a caller error and is ignored.
fn collect_custom_nodes(workflow: &Workflow) -> Vec<CustomNode> {
    let mut seen = BTreeSet::new();
    let mut packages = Vec::new();

    for node in &workflow.nodes {
        let Some(package_id) = node
            .properties
            .as_ref()
            .and_then(|p| p.package_id.as_deref())
        else {
            continue;
        };

        if package_id.is_empty() || package_id == CORE_PACKAGE_ID {
            continue;
        }

        if seen.insert(package_id.to_string()) {
            let version = node
                .properties
                .as_ref()
                .and_then(|p| p.version.clone())
                .unwrap_or_else(|| DEFAULT_PACKAGE_VERSION.to_string());

            packages.push(CustomNode {
                node: package_id.to_string(),
                version,
            });
        }
    }

    packages
}

fn matches_type(node: &WorkflowNode, types: &[&str]) -> bool {
    node.node_type
        .as_deref()
        .is_some_and(|node_type| types.contains(&node_type))
}

/// Stringifies a scalar widget value.
///
/// Empty strings, null, arrays, and objects are discarded; numbers and
/// booleans are rendered with their JSON representation.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(name) if !name.is_empty() => Some(name.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::String(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
