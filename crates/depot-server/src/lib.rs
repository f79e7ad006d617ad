#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod handler;
pub mod middleware;
pub mod service;

#[doc(hidden)]
pub mod prelude;

pub use crate::error::{Error, Result};
