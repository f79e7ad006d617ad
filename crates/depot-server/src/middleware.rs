//! Router middleware layers.
//!
//! Middleware is applied in reverse order (last added = outermost): recovery
//! first catches timeouts, observability wraps requests in tracing spans,
//! and CORS sits innermost above the routes.

use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Request tracing spans for every route.
pub trait RouterObservabilityExt {
    /// Wraps every request in an HTTP tracing span.
    fn with_observability(self) -> Self;
}

impl RouterObservabilityExt for Router {
    fn with_observability(self) -> Self {
        self.layer(TraceLayer::new_for_http())
    }
}

/// Request timeout enforcement.
pub trait RouterRecoveryExt {
    /// Terminates requests exceeding the timeout.
    fn with_recovery(self, request_timeout: Duration) -> Self;
}

impl RouterRecoveryExt for Router {
    fn with_recovery(self, request_timeout: Duration) -> Self {
        self.layer(TimeoutLayer::new(request_timeout))
    }
}

/// Cross-origin resource sharing.
pub trait RouterSecurityExt {
    /// Restricts cross-origin access to the listed origins.
    ///
    /// An empty list allows any origin; intended for local development
    /// with browser-based workflow editors.
    fn with_cors(self, allowed_origins: &[String]) -> Self;
}

impl RouterSecurityExt for Router {
    fn with_cors(self, allowed_origins: &[String]) -> Self {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        let cors = if origins.is_empty() {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(AllowOrigin::list(origins))
        };

        self.layer(cors)
    }
}
