//! Permissive workflow graph types.
//!
//! These types mirror the JSON shape that graph editors export. Workflows
//! arrive from many upstream tools with inconsistent conventions, so every
//! field is optional and deserialization is lenient per field: a wrong-typed
//! field degrades to absent, a malformed element of an array is skipped, and
//! a `nodes` value that is missing or not an array means zero nodes. Nothing
//! about an individual node can fail the whole parse.
//!
//! The distinction between an absent value and an empty string is preserved
//! exactly; downstream extraction relies on it.

mod de;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WorkflowResult;
use crate::graph::de::{lenient, lenient_seq};

/// A workflow definition as exported by graph editors.
///
/// Only the node collection is relevant to dependency analysis; links,
/// groups, and editor state are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Nodes of the graph, in file order.
    #[serde(default, deserialize_with = "lenient_seq")]
    pub nodes: Vec<WorkflowNode>,
}

impl Workflow {
    /// Parses a workflow from raw JSON bytes.
    ///
    /// Invalid JSON is an error; a JSON value that is not workflow-shaped
    /// (not an object, or without a usable `nodes` array) parses as the
    /// empty workflow.
    pub fn from_slice(bytes: &[u8]) -> WorkflowResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(value))
    }

    /// Interprets an already-parsed JSON value as a workflow.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Returns whether the workflow has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A single processing node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Operation tag, e.g. `CheckpointLoaderSimple`. Absent matches nothing.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub node_type: Option<String>,

    /// Positional widget values. Position is semantically meaningful per
    /// node type: index 0 is a filename for one loader and a weight for
    /// another.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub widgets_values: Option<Vec<Value>>,

    /// Side-channel properties attached by the editor.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<NodeProperties>,
}

/// Node properties relevant to dependency analysis.
///
/// Unknown properties are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    /// Origin package id in the node registry; `comfy-core` for built-ins.
    #[serde(
        rename = "cnr_id",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub package_id: Option<String>,

    /// Declared version of the origin package.
    #[serde(
        rename = "ver",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    /// Alternate encoding for model references that bypasses widget values.
    #[serde(
        default,
        deserialize_with = "lenient_seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub models: Vec<ModelRef>,
}

/// A model reference from the `properties.models` side channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRef {
    /// Model filename.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Model directory tag, e.g. `vae` or `text_encoders`.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub directory: Option<String>,

    /// Download URL advertised by the editor; not used for analysis.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
}
