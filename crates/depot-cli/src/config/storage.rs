//! Object-storage configuration arguments.

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use depot_opendal::{BackendType, StorageConfig};
use depot_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Object-storage configuration.
///
/// # Environment Variables
///
/// - `STORAGE_BACKEND` - Storage service: memory, s3, gcs, azblob (default: memory)
/// - `STORAGE_BUCKET` - Bucket, container, or root path (default: comfy-depot)
/// - `STORAGE_REGION` / `STORAGE_ENDPOINT` - S3-compatible service options
/// - `STORAGE_ACCESS_KEY_ID` / `STORAGE_SECRET_ACCESS_KEY` - Credentials
/// - `CONCURRENT_CHECKS` - Bound on concurrent availability lookups
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageArgs {
    /// Storage service to use (memory, s3, gcs, azblob).
    #[arg(long, env = "STORAGE_BACKEND", default_value = "memory")]
    pub storage_backend: String,

    /// Bucket, container, or root path.
    #[arg(long, env = "STORAGE_BUCKET", default_value = "comfy-depot")]
    pub storage_bucket: String,

    /// Region for S3-compatible services.
    #[arg(long, env = "STORAGE_REGION")]
    pub storage_region: Option<String>,

    /// Endpoint override for S3-compatible services.
    #[arg(long, env = "STORAGE_ENDPOINT")]
    pub storage_endpoint: Option<String>,

    /// Access key id (S3) or account name (Azure).
    #[arg(long, env = "STORAGE_ACCESS_KEY_ID")]
    pub storage_access_key_id: Option<String>,

    /// Secret access key (S3) or account key (Azure).
    #[arg(long, env = "STORAGE_SECRET_ACCESS_KEY")]
    pub storage_secret_access_key: Option<String>,

    /// Maximum number of concurrent availability lookups.
    #[arg(long, env = "CONCURRENT_CHECKS", default_value_t = 16)]
    pub concurrent_checks: usize,
}

impl StorageArgs {
    /// Validates all configuration values.
    pub fn validate(&self) -> AnyhowResult<()> {
        self.storage_backend.parse::<BackendType>()?;

        if self.storage_bucket.is_empty() {
            return Err(anyhow!("Storage bucket must not be empty."));
        }

        if self.concurrent_checks == 0 || self.concurrent_checks > 256 {
            return Err(anyhow!(
                "Concurrent checks {} is invalid. Must be between 1 and 256.",
                self.concurrent_checks
            ));
        }

        Ok(())
    }

    /// Builds the service configuration from these arguments.
    pub fn to_service_config(&self) -> AnyhowResult<ServiceConfig> {
        let backend_type = self.storage_backend.parse::<BackendType>()?;

        let mut storage = StorageConfig::new(backend_type, self.storage_bucket.clone());
        storage.region = self.storage_region.clone();
        storage.endpoint = self.storage_endpoint.clone();
        storage.access_key_id = self.storage_access_key_id.clone();
        storage.secret_access_key = self.storage_secret_access_key.clone();

        let mut config = ServiceConfig::new(storage);
        config.concurrent_checks = self.concurrent_checks;
        Ok(config)
    }

    /// Logs configuration at startup (no credentials).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            backend = %self.storage_backend,
            bucket = %self.storage_bucket,
            region = ?self.storage_region,
            endpoint = ?self.storage_endpoint,
            concurrent_checks = self.concurrent_checks,
            "storage configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> StorageArgs {
        StorageArgs {
            storage_backend: "memory".to_string(),
            storage_bucket: "comfy-depot".to_string(),
            storage_region: None,
            storage_endpoint: None,
            storage_access_key_id: None,
            storage_secret_access_key: None,
            concurrent_checks: 16,
        }
    }

    #[test]
    fn test_memory_backend_builds_service_config() {
        let config = args().to_service_config().expect("valid configuration");
        assert_eq!(config.concurrent_checks, 16);
        assert_eq!(config.storage.backend_type, BackendType::Memory);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let mut storage = args();
        storage.storage_backend = "tape".to_string();
        assert!(storage.validate().is_err());
    }

    #[test]
    fn test_empty_bucket_is_rejected() {
        let mut storage = args();
        storage.storage_bucket = String::new();
        assert!(storage.validate().is_err());
    }

    #[test]
    fn test_concurrency_bounds_are_enforced() {
        let mut storage = args();
        storage.concurrent_checks = 0;
        assert!(storage.validate().is_err());

        storage.concurrent_checks = 512;
        assert!(storage.validate().is_err());
    }
}
