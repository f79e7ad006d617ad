//! HTTP error handling.

use std::borrow::Cow;
use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use depot_opendal::StorageError;
use serde::Serialize;

/// A specialized [`Result`] type for HTTP handlers.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for HTTP handlers in the server.
#[derive(Debug, Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error {
    kind: ErrorKind,
    context: Option<Cow<'static, str>>,
    resource: Option<Cow<'static, str>>,
}

impl Error {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            resource: None,
        }
    }

    /// Attaches context information to the error.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Sets the resource that caused the error.
    #[inline]
    pub fn with_resource(self, resource: impl Into<Cow<'static, str>>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.kind.name(),
            self.kind.status(),
            self.context.as_deref().unwrap_or(self.kind.message())
        )?;

        if let Some(ref resource) = self.resource {
            write!(f, " [resource: {resource}]")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.kind.name(),
            message: self
                .context
                .unwrap_or_else(|| Cow::Borrowed(self.kind.message())),
            resource: self.resource,
        };

        (self.kind.status(), Json(body)).into_response()
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => {
                Error::new(ErrorKind::NotFound).with_resource(path)
            }
            StorageError::PermissionDenied(_) | StorageError::Backend(_) => {
                Error::new(ErrorKind::ServiceUnavailable).with_context(err.to_string())
            }
            StorageError::Init(_) => Error::new(ErrorKind::Internal).with_context(err.to_string()),
        }
    }
}

impl From<crate::Error> for Error {
    fn from(err: crate::Error) -> Self {
        match err {
            crate::Error::AnalysisNotFound(id) => {
                Error::new(ErrorKind::NotFound).with_resource(id.to_string())
            }
            crate::Error::Storage(storage) => storage.into(),
            crate::Error::Serialization(serde) => {
                Error::new(ErrorKind::Internal).with_context(serde.to_string())
            }
        }
    }
}

/// All error kinds the handlers can produce.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 Bad Request - Invalid request data.
    BadRequest,
    /// 404 Not Found - Requested resource does not exist.
    NotFound,
    /// 503 Service Unavailable - Storage backend unreachable.
    ServiceUnavailable,
    /// 500 Internal Server Error.
    #[default]
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Internal => "internal_error",
        }
    }

    /// Default human-readable message.
    pub const fn message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be understood.",
            Self::NotFound => "The requested resource was not found.",
            Self::ServiceUnavailable => "The storage backend is unavailable.",
            Self::Internal => "An internal error occurred.",
        }
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        Error::new(self).into_response()
    }
}

/// Serialized error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error name.
    pub error: &'static str,
    /// Human-readable message.
    pub message: Cow<'static, str>,
    /// Resource the error refers to, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'static, str>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let error: Error = StorageError::not_found("models/vae/x.safetensors").into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_analysis_not_found_maps_to_404() {
        let error: Error = crate::Error::AnalysisNotFound(uuid::Uuid::nil()).into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.kind().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_display_includes_kind_and_resource() {
        let error = Error::new(ErrorKind::NotFound).with_resource("workflows/x");
        let rendered = error.to_string();
        assert!(rendered.contains("not_found"));
        assert!(rendered.contains("workflows/x"));
    }
}
