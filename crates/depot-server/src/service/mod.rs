//! Application state and dependency injection.

mod analyses;
mod availability;
mod provision;

pub mod paths;

use depot_opendal::{StorageBackend, StorageConfig};
use serde::{Deserialize, Serialize};

pub use crate::service::analyses::AnalysisService;
pub use crate::service::availability::{
    AvailabilityReport, AvailabilityService, DEFAULT_CONCURRENT_CHECKS,
};
pub use crate::service::provision::{ProvisionRequest, ProvisionService};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Service layer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Storage backend holding models, custom nodes, and analyses.
    pub storage: StorageConfig,
    /// Maximum number of concurrent storage existence lookups.
    #[serde(default = "default_concurrent_checks")]
    pub concurrent_checks: usize,
}

fn default_concurrent_checks() -> usize {
    DEFAULT_CONCURRENT_CHECKS
}

impl ServiceConfig {
    /// Creates a config for the given storage backend with defaults.
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            storage,
            concurrent_checks: DEFAULT_CONCURRENT_CHECKS,
        }
    }
}

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pub storage: StorageBackend,
    pub analyses: AnalysisService,
    pub availability: AvailabilityService,
    pub provision: ProvisionService,
}

impl ServiceState {
    /// Initializes application state from configuration.
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let storage = StorageBackend::new(config.storage)?;
        Ok(Self::with_storage(storage, config.concurrent_checks))
    }

    /// Initializes application state over an existing storage backend.
    pub fn with_storage(storage: StorageBackend, concurrent_checks: usize) -> Self {
        Self {
            analyses: AnalysisService::new(storage.clone()),
            availability: AvailabilityService::new(storage.clone(), concurrent_checks),
            provision: ProvisionService::new(storage.clone()),
            storage,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(
    storage: StorageBackend,
    analyses: AnalysisService,
    availability: AvailabilityService,
    provision: ProvisionService,
);
