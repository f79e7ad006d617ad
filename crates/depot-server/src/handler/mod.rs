//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod availability;
mod error;
mod monitors;
mod provision;
mod workflows;

use axum::Router;

pub use crate::handler::error::{Error, ErrorKind, ErrorResponse, Result};
use crate::service::ServiceState;

/// Returns a [`Router`] with all API routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(workflows::routes())
        .merge(availability::routes())
        .merge(provision::routes())
        .merge(monitors::routes())
}

#[cfg(test)]
pub(crate) mod test {
    use axum_test::TestServer;
    use depot_opendal::StorageBackend;

    use crate::service::{DEFAULT_CONCURRENT_CHECKS, ServiceState};

    /// Creates a test server over a fresh in-memory bucket.
    pub(crate) fn create_test_server() -> anyhow::Result<(TestServer, ServiceState)> {
        let storage = StorageBackend::memory()?;
        let state = ServiceState::with_storage(storage, DEFAULT_CONCURRENT_CHECKS);
        let router = super::routes().with_state(state.clone());

        Ok((TestServer::new(router)?, state))
    }
}
