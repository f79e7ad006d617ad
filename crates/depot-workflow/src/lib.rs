#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
pub mod extract;
pub mod graph;
pub mod manifest;

#[doc(hidden)]
pub mod prelude;

pub use error::{WorkflowError, WorkflowResult};
pub use extract::extract;

/// Tracing target for workflow analysis operations.
pub const TRACING_TARGET: &str = "depot_workflow";
