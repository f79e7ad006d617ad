//! Server error types.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result type for server lifecycle operations.
pub type Result<T, E = ServerError> = std::result::Result<T, E>;

/// Errors that can occur while running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listener to the configured address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address the server attempted to bind.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The server failed while serving requests.
    #[error("server runtime error: {0}")]
    Runtime(#[from] io::Error),
}
