//! Storage configuration types.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Supported storage services.
///
/// Variants are always declared; building an operator for a service whose
/// cargo feature is disabled fails at runtime with an init error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// In-memory storage for tests and local development.
    #[display("memory")]
    Memory,
    /// Amazon S3 compatible storage.
    #[display("s3")]
    S3,
    /// Google Cloud Storage.
    #[display("gcs")]
    Gcs,
    /// Azure Blob Storage.
    #[display("azblob")]
    AzureBlob,
}

impl FromStr for BackendType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "s3" => Ok(Self::S3),
            "gcs" => Ok(Self::Gcs),
            "azblob" => Ok(Self::AzureBlob),
            other => Err(StorageError::init(format!(
                "unknown storage backend: {other}"
            ))),
        }
    }
}

/// Storage backend configuration.
///
/// `root` names the bucket (S3/GCS), container (Azure), or path prefix
/// (memory). Credential fields are optional; cloud services fall back to
/// their ambient credential chains when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "config does nothing unless used to build a backend"]
pub struct StorageConfig {
    /// Which storage service to use.
    pub backend_type: BackendType,
    /// Bucket, container, or root path.
    pub root: String,
    /// Region for S3-compatible services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Endpoint override for S3-compatible services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Access key id (S3) or account name (Azure).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// Secret access key (S3) or account key (Azure).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
}

impl StorageConfig {
    /// Creates a config for the given backend and root.
    pub fn new(backend_type: BackendType, root: impl Into<String>) -> Self {
        Self {
            backend_type,
            root: root.into(),
            region: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }

    /// Creates an in-memory config for tests and local development.
    #[cfg(feature = "memory")]
    pub fn memory() -> Self {
        Self::new(BackendType::Memory, "/")
    }
}
