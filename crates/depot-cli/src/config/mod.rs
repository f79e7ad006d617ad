//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig    # Host, port, timeouts, CORS
//! └── storage: StorageArgs    # Bucket, credentials, check concurrency
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Configure storage and server
//! depot-cli --storage-backend s3 --storage-bucket comfy-depot --port 8080
//!
//! # Or via environment variables
//! STORAGE_BACKEND=s3 STORAGE_BUCKET=comfy-depot PORT=8080 depot-cli
//! ```

mod server;
mod storage;

use std::process;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
pub use storage::StorageArgs;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TRACING_TARGET_SERVER_STARTUP;

/// Complete CLI configuration.
///
/// Combines all configuration groups for the depot server:
/// - [`ServerConfig`]: Network binding, timeouts, and CORS
/// - [`StorageArgs`]: Storage bucket and availability checking
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "depot")]
#[command(about = "ComfyDepot workflow dependency analysis server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Object-storage configuration.
    #[clap(flatten)]
    pub storage: StorageArgs,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses
    /// CLI arguments.
    ///
    /// .env files must be loaded before clap parses arguments, so that
    /// environment variables from .env can be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is
    /// enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.storage
            .validate()
            .context("invalid storage configuration")?;
        Ok(())
    }

    /// Logs configuration at startup (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.storage.log();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn test_defaults_are_valid() {
        let cli = parse(&["depot"]);
        cli.validate().expect("default configuration is valid");
    }

    #[test]
    fn test_storage_backend_is_validated() {
        let cli = parse(&["depot", "--storage-backend", "ftp"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_port_flag_is_honored() {
        let cli = parse(&["depot", "--port", "8080"]);
        assert_eq!(cli.server.port, 8080);
    }
}
