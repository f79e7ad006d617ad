//! Prelude module for convenient imports.

pub use crate::error::{WorkflowError, WorkflowResult};
pub use crate::extract::extract;
pub use crate::graph::{ModelRef, NodeProperties, Workflow, WorkflowNode};
pub use crate::manifest::{
    CORE_PACKAGE_ID, CustomNode, DEFAULT_PACKAGE_VERSION, DependencyManifest, ModelCategory,
};
