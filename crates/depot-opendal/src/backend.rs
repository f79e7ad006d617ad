//! Storage backend implementation.

use opendal::{Operator, services};

use crate::TRACING_TARGET;
use crate::config::{BackendType, StorageConfig};
use crate::error::{StorageError, StorageResult};

/// Unified storage backend that wraps OpenDAL operators.
#[derive(Clone)]
pub struct StorageBackend {
    operator: Operator,
    config: StorageConfig,
}

impl StorageBackend {
    /// Creates a new storage backend from configuration.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let operator = Self::create_operator(&config)?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_type,
            root = %config.root,
            "storage backend initialized"
        );

        Ok(Self { operator, config })
    }

    /// Creates an in-memory backend for tests and local development.
    #[cfg(feature = "memory")]
    pub fn memory() -> StorageResult<Self> {
        Self::new(StorageConfig::memory())
    }

    /// Returns the configuration for this backend.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Returns the backend type.
    pub fn backend_type(&self) -> BackendType {
        self.config.backend_type
    }

    /// Reads an object from storage.
    pub async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let data = self.operator.read(path).await?.to_vec();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = data.len(),
            "object read"
        );

        Ok(data)
    }

    /// Writes an object to storage.
    pub async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        self.operator.write(path, data.to_vec()).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = data.len(),
            "object written"
        );

        Ok(())
    }

    /// Deletes an object from storage.
    pub async fn delete(&self, path: &str) -> StorageResult<()> {
        self.operator.delete(path).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            "object deleted"
        );

        Ok(())
    }

    /// Checks whether an object exists.
    pub async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.operator.exists(path).await?)
    }

    /// Gets metadata for an object.
    pub async fn stat(&self, path: &str) -> StorageResult<FileMetadata> {
        let meta = self.operator.stat(path).await?;

        // Convert chrono DateTime to jiff Timestamp
        let last_modified = meta
            .last_modified()
            .and_then(|dt| jiff::Timestamp::from_second(dt.timestamp()).ok());

        Ok(FileMetadata {
            size: meta.content_length(),
            last_modified,
            content_type: meta.content_type().map(|s| s.to_string()),
        })
    }

    /// Lists entries directly under a path.
    pub async fn list(&self, path: &str) -> StorageResult<Vec<String>> {
        use futures::TryStreamExt;

        let entries: Vec<_> = self.operator.lister(path).await?.try_collect().await?;

        Ok(entries.into_iter().map(|e| e.path().to_string()).collect())
    }

    /// Verifies that the backend is reachable.
    pub async fn check(&self) -> StorageResult<()> {
        Ok(self.operator.check().await?)
    }

    /// Creates an OpenDAL operator based on configuration.
    #[allow(unreachable_patterns)]
    fn create_operator(config: &StorageConfig) -> StorageResult<Operator> {
        match config.backend_type {
            #[cfg(feature = "memory")]
            BackendType::Memory => {
                let builder = services::Memory::default().root(&config.root);

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            #[cfg(feature = "s3")]
            BackendType::S3 => {
                let mut builder = services::S3::default().bucket(&config.root);

                if let Some(ref region) = config.region {
                    builder = builder.region(region);
                }

                if let Some(ref endpoint) = config.endpoint {
                    builder = builder.endpoint(endpoint);
                }

                if let Some(ref access_key_id) = config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }

                if let Some(ref secret_access_key) = config.secret_access_key {
                    builder = builder.secret_access_key(secret_access_key);
                }

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            #[cfg(feature = "gcs")]
            BackendType::Gcs => {
                let builder = services::Gcs::default().bucket(&config.root);

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            #[cfg(feature = "azblob")]
            BackendType::AzureBlob => {
                let mut builder = services::Azblob::default().container(&config.root);

                if let Some(ref account_name) = config.access_key_id {
                    builder = builder.account_name(account_name);
                }

                if let Some(ref account_key) = config.secret_access_key {
                    builder = builder.account_key(account_key);
                }

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            // Reached when the configured backend's feature is disabled
            #[allow(unreachable_patterns)]
            _ => Err(StorageError::init(format!(
                "backend type {} is not supported with current features",
                config.backend_type
            ))),
        }
    }
}

/// Object metadata.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: Option<jiff::Timestamp>,
    /// Content type / MIME type.
    pub content_type: Option<String>,
}

impl std::fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBackend")
            .field("backend_type", &self.config.backend_type)
            .field("root", &self.config.root)
            .finish()
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_round_trip() -> StorageResult<()> {
        let backend = StorageBackend::memory()?;

        backend.write("models/vae/ae.safetensors", b"weights").await?;
        let data = backend.read("models/vae/ae.safetensors").await?;

        assert_eq!(data, b"weights");
        Ok(())
    }

    #[tokio::test]
    async fn test_exists_reflects_writes() -> StorageResult<()> {
        let backend = StorageBackend::memory()?;

        assert!(!backend.exists("models/clip/missing.safetensors").await?);

        backend.write("models/clip/found.safetensors", b"x").await?;
        assert!(backend.exists("models/clip/found.safetensors").await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() -> StorageResult<()> {
        let backend = StorageBackend::memory()?;

        let result = backend.read("nowhere.json").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_removes_object() -> StorageResult<()> {
        let backend = StorageBackend::memory()?;

        backend.write("provision/req.json", b"{}").await?;
        backend.delete("provision/req.json").await?;

        assert!(!backend.exists("provision/req.json").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_stat_reports_size() -> StorageResult<()> {
        let backend = StorageBackend::memory()?;

        backend.write("workflows/a/workflow.json", b"{}").await?;
        let meta = backend.stat("workflows/a/workflow.json").await?;

        assert_eq!(meta.size, 2);
        Ok(())
    }
}
