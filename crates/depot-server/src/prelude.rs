//! Prelude module for convenient imports.

pub use crate::error::{Error, Result};
pub use crate::handler::routes;
pub use crate::middleware::{RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt};
pub use crate::service::{
    AnalysisService, AvailabilityReport, AvailabilityService, ProvisionRequest, ProvisionService,
    ServiceConfig, ServiceState,
};
